//! Citizen feedback: model, submission, and per-user listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::identity::Identity;
use crate::ledger::{ScoreChange, TrustScoreLedger};
use crate::project::get_project;
use crate::store::{field_map, DocumentStore, FieldValue, FEEDBACK_COLLECTION};
use crate::types::{DocId, Timestamp};

/// Recorded as `projectName` when the referenced project does not exist.
pub const UNKNOWN_PROJECT_NAME: &str = "Unknown Project";

/// Maximum accepted length of an image file name.
pub const MAX_IMAGE_FILE_NAME_LEN: u64 = 255;

/// A document from the `feedback` collection. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: DocId,
    pub user_id: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub project_id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub feedback: String,
    /// Set by an external moderation process; always `false` here.
    pub verified: bool,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub image_file_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Input for [`submit_feedback`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    /// Project the feedback is about. May reference a missing project.
    #[serde(default)]
    pub project_id: String,
    #[validate(custom(function = "not_blank"))]
    pub feedback: String,
    /// Name of an attached image. Only the name is kept.
    #[validate(length(min = 1, max = MAX_IMAGE_FILE_NAME_LEN))]
    pub image_file_name: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// What [`submit_feedback`] produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReceipt {
    pub feedback_id: DocId,
    /// `None` when the project id was empty or referenced no project.
    pub score_change: Option<ScoreChange>,
}

/// Record feedback from `author` and credit the referenced project.
///
/// Every accepted submission with a non-empty project id applies the
/// verified-feedback delta to that project, even though the stored entry
/// starts out with `verified = false`. The feedback write and the score write
/// are separate round-trips; if the second fails the feedback stays stored.
pub async fn submit_feedback(
    store: &dyn DocumentStore,
    author: &Identity,
    input: &NewFeedback,
) -> Result<FeedbackReceipt, CoreError> {
    input.validate()?;

    let project_id = input.project_id.trim();
    let project_name = if project_id.is_empty() {
        None
    } else {
        Some(
            get_project(store, project_id)
                .await?
                .map(|p| p.name)
                .unwrap_or_else(|| UNKNOWN_PROJECT_NAME.to_string()),
        )
    };

    let feedback_id = store
        .create(
            FEEDBACK_COLLECTION,
            field_map([
                ("userId", FieldValue::json(author.user_id.as_str())),
                ("userEmail", FieldValue::json(author.email.clone())),
                ("userName", FieldValue::json(author.display_name.clone())),
                ("projectId", FieldValue::json(project_id)),
                ("projectName", FieldValue::json(project_name)),
                ("feedback", FieldValue::json(input.feedback.trim())),
                ("verified", FieldValue::json(false)),
                ("hasImage", FieldValue::json(input.image_file_name.is_some())),
                ("imageFileName", FieldValue::json(input.image_file_name.clone())),
                ("createdAt", FieldValue::ServerTimestamp),
            ]),
        )
        .await?;
    tracing::info!(%feedback_id, project_id, user_id = %author.user_id, "Feedback submitted");

    let score_change = if project_id.is_empty() {
        None
    } else {
        TrustScoreLedger::new(store)
            .record_verified_feedback(project_id, author)
            .await?
            .applied()
    };

    Ok(FeedbackReceipt {
        feedback_id,
        score_change,
    })
}

/// All feedback submitted by `user_id`, oldest first.
pub async fn list_feedback_for_user(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<FeedbackEntry>, CoreError> {
    let docs = store
        .query_eq(FEEDBACK_COLLECTION, "userId", &Value::from(user_id))
        .await?;
    docs.into_iter()
        .map(|doc| doc.decode().map_err(CoreError::from))
        .collect()
}

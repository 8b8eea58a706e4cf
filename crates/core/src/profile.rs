//! User profiles, keyed by the authenticated user's id.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::identity::Identity;
use crate::store::{DocumentStore, FieldMap, FieldValue, USERS_COLLECTION};
use crate::types::{DocId, Timestamp};

/// A document from the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: DocId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Profile fields a user may change. Omitted fields fall back to the
/// session identity.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub display_name: Option<String>,
}

/// Create or merge the caller's profile and return the stored result.
///
/// `createdAt` is written only when the profile does not exist yet.
pub async fn upsert_profile(
    store: &dyn DocumentStore,
    identity: &Identity,
    update: &ProfileUpdate,
) -> Result<UserProfile, CoreError> {
    update.validate()?;

    let existing = store.get(USERS_COLLECTION, &identity.user_id).await?;

    let mut fields = FieldMap::new();
    if let Some(email) = update.email.clone().or_else(|| identity.email.clone()) {
        fields.insert("email".into(), FieldValue::json(email));
    }
    if let Some(name) = update
        .display_name
        .clone()
        .or_else(|| identity.display_name.clone())
    {
        fields.insert("displayName".into(), FieldValue::json(name));
    }
    if existing.is_none() {
        fields.insert("createdAt".into(), FieldValue::ServerTimestamp);
    }
    fields.insert("updatedAt".into(), FieldValue::ServerTimestamp);

    store
        .set_merge(USERS_COLLECTION, &identity.user_id, fields)
        .await?;

    get_profile(store, &identity.user_id)
        .await?
        .ok_or_else(|| CoreError::Internal("Profile missing after write".into()))
}

/// The profile for `user_id`, if one was ever written.
pub async fn get_profile(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Option<UserProfile>, CoreError> {
    match store.get(USERS_COLLECTION, user_id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

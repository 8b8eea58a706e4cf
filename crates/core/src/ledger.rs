//! Trust-score ledger: applies score events to stored projects.
//!
//! Each operation reads the project, computes the new score with
//! [`apply_delta`], and writes score, status, and timestamps back in a single
//! field-map update against that one document. There is no version check
//! between the read and the write, so concurrent operations on the same
//! project are last-writer-wins.

use serde::Serialize;

use crate::error::CoreError;
use crate::identity::Identity;
use crate::project::{Project, ProjectStatus};
use crate::store::{field_map, DocumentStore, FieldValue, StoreError, PROJECTS_COLLECTION};
use crate::trust_score::{apply_delta, ScoreEvent};
use crate::types::DocId;

/// A score change that was written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub project_id: DocId,
    pub event: ScoreEvent,
    pub previous_score: i32,
    pub new_score: i32,
    /// Project status after the change.
    pub status: ProjectStatus,
}

/// Result of a ledger operation that reached the store without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOutcome {
    Applied(ScoreChange),
    /// No project has the requested id. Nothing was written.
    ProjectNotFound,
}

impl LedgerOutcome {
    pub fn applied(self) -> Option<ScoreChange> {
        match self {
            Self::Applied(change) => Some(change),
            Self::ProjectNotFound => None,
        }
    }
}

/// Applies [`ScoreEvent`]s to projects held in a [`DocumentStore`].
pub struct TrustScoreLedger<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> TrustScoreLedger<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// +5 and status `On-time`.
    pub async fn record_milestone_complete(
        &self,
        project_id: &str,
        actor: &Identity,
    ) -> Result<LedgerOutcome, CoreError> {
        self.record(project_id, ScoreEvent::MilestoneComplete, actor)
            .await
    }

    /// -10 and status `Delayed`.
    pub async fn record_project_delayed(
        &self,
        project_id: &str,
        actor: &Identity,
    ) -> Result<LedgerOutcome, CoreError> {
        self.record(project_id, ScoreEvent::ProjectDelayed, actor)
            .await
    }

    /// +5, status unchanged.
    pub async fn record_verified_feedback(
        &self,
        project_id: &str,
        actor: &Identity,
    ) -> Result<LedgerOutcome, CoreError> {
        self.record(project_id, ScoreEvent::VerifiedFeedback, actor)
            .await
    }

    async fn record(
        &self,
        project_id: &str,
        event: ScoreEvent,
        actor: &Identity,
    ) -> Result<LedgerOutcome, CoreError> {
        let Some(doc) = self.store.get(PROJECTS_COLLECTION, project_id).await? else {
            tracing::warn!(
                project_id,
                %event,
                actor = %actor.user_id,
                "Score event for unknown project ignored"
            );
            return Ok(LedgerOutcome::ProjectNotFound);
        };
        let project: Project = doc.decode()?;

        let new_score = apply_delta(project.trust_score, event.delta());
        let mut fields = field_map([
            ("trustScore", FieldValue::json(new_score)),
            ("lastUpdated", FieldValue::ServerTimestamp),
        ]);
        let status = match event.status_transition() {
            Some(next) => {
                fields.insert("status".into(), FieldValue::json(next.as_str()));
                fields.insert("lastStatusChange".into(), FieldValue::ServerTimestamp);
                next
            }
            None => project.status,
        };

        match self
            .store
            .update(PROJECTS_COLLECTION, project_id, fields)
            .await
        {
            Ok(()) => {}
            // Removed between the read and the write.
            Err(StoreError::DocumentNotFound { .. }) => {
                tracing::warn!(project_id, %event, "Project vanished before score write");
                return Ok(LedgerOutcome::ProjectNotFound);
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            project_id,
            %event,
            previous_score = project.trust_score,
            new_score,
            %status,
            actor = %actor.user_id,
            "Trust score updated"
        );

        Ok(LedgerOutcome::Applied(ScoreChange {
            project_id: project.id,
            event,
            previous_score: project.trust_score,
            new_score,
            status,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use crate::store::{Document, FieldMap};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    fn admin() -> Identity {
        Identity::new("admin-1").with_email("admin@example.gov")
    }

    async fn seed(store: &InMemoryStore, score: i32, status: ProjectStatus) -> DocId {
        store
            .create(
                PROJECTS_COLLECTION,
                field_map([
                    ("name", FieldValue::json("Harbor Dredging")),
                    ("department", FieldValue::json("Ports Authority")),
                    ("trustScore", FieldValue::json(score)),
                    ("status", FieldValue::json(status.as_str())),
                ]),
            )
            .await
            .unwrap()
    }

    async fn load(store: &InMemoryStore, id: &str) -> Project {
        store
            .get(PROJECTS_COLLECTION, id)
            .await
            .unwrap()
            .unwrap()
            .decode()
            .unwrap()
    }

    // -- Milestone complete --

    #[tokio::test]
    async fn milestone_complete_adds_five_and_sets_on_time() {
        let store = InMemoryStore::new();
        let id = seed(&store, 80, ProjectStatus::Delayed).await;

        let outcome = TrustScoreLedger::new(&store)
            .record_milestone_complete(&id, &admin())
            .await
            .unwrap();

        let change = assert_matches!(outcome, LedgerOutcome::Applied(c) => c);
        assert_eq!(change.previous_score, 80);
        assert_eq!(change.new_score, 85);
        assert_eq!(change.status, ProjectStatus::OnTime);
        assert_eq!(change.event, ScoreEvent::MilestoneComplete);

        let project = load(&store, &id).await;
        assert_eq!(project.trust_score, 85);
        assert_eq!(project.status, ProjectStatus::OnTime);
        assert!(project.last_updated.is_some());
        assert!(project.last_status_change.is_some());
    }

    #[tokio::test]
    async fn milestone_complete_clamps_at_one_hundred() {
        let store = InMemoryStore::new();
        let id = seed(&store, 96, ProjectStatus::OnTime).await;

        TrustScoreLedger::new(&store)
            .record_milestone_complete(&id, &admin())
            .await
            .unwrap();

        assert_eq!(load(&store, &id).await.trust_score, 100);
    }

    // -- Project delayed --

    #[tokio::test]
    async fn project_delayed_subtracts_ten_and_sets_delayed() {
        let store = InMemoryStore::new();
        let id = seed(&store, 80, ProjectStatus::OnTime).await;

        TrustScoreLedger::new(&store)
            .record_project_delayed(&id, &admin())
            .await
            .unwrap();

        let project = load(&store, &id).await;
        assert_eq!(project.trust_score, 70);
        assert_eq!(project.status, ProjectStatus::Delayed);
    }

    #[tokio::test]
    async fn project_delayed_clamps_at_zero() {
        let store = InMemoryStore::new();
        let id = seed(&store, 5, ProjectStatus::OnTime).await;

        TrustScoreLedger::new(&store)
            .record_project_delayed(&id, &admin())
            .await
            .unwrap();

        assert_eq!(load(&store, &id).await.trust_score, 0);
    }

    #[tokio::test]
    async fn status_transitions_ignore_prior_status() {
        let store = InMemoryStore::new();
        let ledger = TrustScoreLedger::new(&store);

        for prior in [ProjectStatus::OnTime, ProjectStatus::Delayed] {
            let id = seed(&store, 50, prior).await;
            ledger.record_project_delayed(&id, &admin()).await.unwrap();
            assert_eq!(load(&store, &id).await.status, ProjectStatus::Delayed);

            let id = seed(&store, 50, prior).await;
            ledger
                .record_milestone_complete(&id, &admin())
                .await
                .unwrap();
            assert_eq!(load(&store, &id).await.status, ProjectStatus::OnTime);
        }
    }

    // -- Verified feedback --

    #[tokio::test]
    async fn verified_feedback_adds_five_and_keeps_status() {
        let store = InMemoryStore::new();
        let id = seed(&store, 90, ProjectStatus::Delayed).await;

        let change = TrustScoreLedger::new(&store)
            .record_verified_feedback(&id, &admin())
            .await
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(change.new_score, 95);
        assert_eq!(change.status, ProjectStatus::Delayed);

        let project = load(&store, &id).await;
        assert_eq!(project.trust_score, 95);
        assert_eq!(project.status, ProjectStatus::Delayed);
        assert!(project.last_status_change.is_none());
    }

    // -- Missing project --

    #[tokio::test]
    async fn unknown_project_is_a_no_op_for_every_event() {
        let store = InMemoryStore::new();
        let existing = seed(&store, 42, ProjectStatus::OnTime).await;
        let before = store.list(PROJECTS_COLLECTION).await.unwrap();
        let ledger = TrustScoreLedger::new(&store);

        let outcomes = [
            ledger.record_milestone_complete("ghost", &admin()).await,
            ledger.record_project_delayed("ghost", &admin()).await,
            ledger.record_verified_feedback("ghost", &admin()).await,
        ];
        for outcome in outcomes {
            assert_matches!(outcome, Ok(LedgerOutcome::ProjectNotFound));
        }

        assert_eq!(store.list(PROJECTS_COLLECTION).await.unwrap(), before);
        assert_eq!(load(&store, &existing).await.trust_score, 42);
    }

    // -- Store failures --

    /// Store that can read but rejects every write.
    struct ReadOnlyStore(InMemoryStore);

    #[async_trait]
    impl DocumentStore for ReadOnlyStore {
        async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
            self.0.get(collection, id).await
        }
        async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
            self.0.list(collection).await
        }
        async fn query_eq(
            &self,
            collection: &str,
            field: &str,
            value: &Value,
        ) -> Result<Vec<Document>, StoreError> {
            self.0.query_eq(collection, field, value).await
        }
        async fn create(&self, _: &str, _: FieldMap) -> Result<DocId, StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
        async fn update(&self, _: &str, _: &str, _: FieldMap) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
        async fn set_merge(&self, _: &str, _: &str, _: FieldMap) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn write_failure_surfaces_as_store_unavailable() {
        let inner = InMemoryStore::new();
        let id = seed(&inner, 60, ProjectStatus::OnTime).await;
        let store = ReadOnlyStore(inner);

        let result = TrustScoreLedger::new(&store)
            .record_project_delayed(&id, &admin())
            .await;

        assert_matches!(result, Err(CoreError::StoreUnavailable(_)));
        let doc = store.get(PROJECTS_COLLECTION, &id).await.unwrap().unwrap();
        assert_eq!(doc.data["trustScore"], json!(60));
    }

    #[tokio::test]
    async fn malformed_project_is_an_internal_error() {
        let store = InMemoryStore::new();
        let id = store
            .create(
                PROJECTS_COLLECTION,
                field_map([("name", FieldValue::json("No score"))]),
            )
            .await
            .unwrap();

        let result = TrustScoreLedger::new(&store)
            .record_milestone_complete(&id, &admin())
            .await;

        assert_matches!(result, Err(CoreError::Internal(_)));
    }
}

//! Project documents: model, status, reads, and demo seeding.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::store::{field_map, DocumentStore, FieldValue, PROJECTS_COLLECTION};
use crate::trust_score::{TrustBand, INITIAL_TRUST_SCORE};
use crate::types::{DocId, Timestamp};

/// Delivery status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "On-time")]
    OnTime,
    #[serde(rename = "Delayed")]
    Delayed,
}

impl ProjectStatus {
    /// Value stored in the `status` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTime => "On-time",
            Self::Delayed => "Delayed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document from the `projects` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DocId,
    pub name: String,
    pub department: String,
    pub trust_score: i32,
    pub status: ProjectStatus,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
    #[serde(default)]
    pub last_status_change: Option<Timestamp>,
}

impl Project {
    pub fn trust_band(&self) -> TrustBand {
        TrustBand::from_score(self.trust_score)
    }
}

/// A project together with its derived display band.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub trust_band: TrustBand,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        let trust_band = project.trust_band();
        Self {
            project,
            trust_band,
        }
    }
}

/// All projects, oldest first.
pub async fn list_projects(store: &dyn DocumentStore) -> Result<Vec<Project>, CoreError> {
    let docs = store.list(PROJECTS_COLLECTION).await?;
    docs.into_iter()
        .map(|doc| doc.decode().map_err(CoreError::from))
        .collect()
}

/// One project, or `None` if no document has this id.
pub async fn get_project(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Project>, CoreError> {
    match store.get(PROJECTS_COLLECTION, id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Projects created by [`seed_demo_projects`], as `(name, department)`.
pub const DEMO_PROJECTS: &[(&str, &str)] = &[
    ("Riverside Bridge Rehabilitation", "Department of Transportation"),
    ("Rural Broadband Expansion", "Ministry of Digital Infrastructure"),
    ("Central District Water Treatment Upgrade", "Public Utilities Board"),
    ("Community Health Clinic Network", "Department of Health"),
    ("School Solar Retrofit Program", "Department of Education"),
    ("Northern Highway Resurfacing", "Department of Transportation"),
];

/// Seed the demo projects if the collection is empty.
///
/// Returns the number of projects created; `0` when projects already exist.
pub async fn seed_demo_projects(store: &dyn DocumentStore) -> Result<usize, CoreError> {
    if !store.list(PROJECTS_COLLECTION).await?.is_empty() {
        return Ok(0);
    }

    for (name, department) in DEMO_PROJECTS {
        let id = store
            .create(
                PROJECTS_COLLECTION,
                field_map([
                    ("name", FieldValue::json(*name)),
                    ("department", FieldValue::json(*department)),
                    ("trustScore", FieldValue::json(INITIAL_TRUST_SCORE)),
                    ("status", FieldValue::json(ProjectStatus::OnTime.as_str())),
                    ("lastUpdated", FieldValue::ServerTimestamp),
                ]),
            )
            .await?;
        tracing::debug!(project_id = %id, name, "Seeded demo project");
    }

    tracing::info!(count = DEMO_PROJECTS.len(), "Seeded demo projects");
    Ok(DEMO_PROJECTS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_stored_names() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::OnTime).unwrap(),
            json!("On-time")
        );
        let parsed: ProjectStatus = serde_json::from_value(json!("Delayed")).unwrap();
        assert_eq!(parsed, ProjectStatus::Delayed);
    }

    #[test]
    fn summary_flattens_project_and_adds_band() {
        let project = Project {
            id: "p1".into(),
            name: "Bridge".into(),
            department: "Transport".into(),
            trust_score: 55,
            status: ProjectStatus::Delayed,
            last_updated: None,
            last_status_change: None,
        };
        let json = serde_json::to_value(ProjectSummary::from(project)).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["trustScore"], 55);
        assert_eq!(json["status"], "Delayed");
        assert_eq!(json["trustBand"], "moderate");
    }

    #[tokio::test]
    async fn seed_creates_projects_once() {
        let store = InMemoryStore::new();

        let created = seed_demo_projects(&store).await.unwrap();
        assert_eq!(created, DEMO_PROJECTS.len());

        let again = seed_demo_projects(&store).await.unwrap();
        assert_eq!(again, 0);

        let projects = list_projects(&store).await.unwrap();
        assert_eq!(projects.len(), DEMO_PROJECTS.len());
        assert!(projects
            .iter()
            .all(|p| p.trust_score == INITIAL_TRUST_SCORE && p.status == ProjectStatus::OnTime));
        assert_eq!(projects[0].name, DEMO_PROJECTS[0].0);
    }

    #[tokio::test]
    async fn get_project_missing_is_none() {
        let store = InMemoryStore::new();
        assert!(get_project(&store, "missing").await.unwrap().is_none());
    }
}

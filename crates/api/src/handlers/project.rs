//! Handlers for the public `/projects` resource.

use axum::extract::{Path, State};
use axum::Json;
use govtrust_core::project::{self, ProjectSummary};

use crate::error::{AppError, AppResult};
use crate::response::{self, DataResponse};
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = project::list_projects(state.store()).await?;
    Ok(response::list(
        projects.into_iter().map(ProjectSummary::from).collect(),
    ))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProjectSummary>> {
    let project = project::get_project(state.store(), &id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    Ok(Json(project.into()))
}

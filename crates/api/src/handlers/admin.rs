//! Handlers for the admin score controls.
//!
//! Any signed-in user may call these; there is no role check.

use axum::extract::{Path, State};
use axum::Json;
use govtrust_core::ledger::{LedgerOutcome, ScoreChange, TrustScoreLedger};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/admin/projects/{id}/milestone-complete
pub async fn milestone_complete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ScoreChange>> {
    let outcome = TrustScoreLedger::new(state.store())
        .record_milestone_complete(&id, &actor)
        .await?;
    applied_or_not_found(outcome, id)
}

/// POST /api/v1/admin/projects/{id}/delayed
pub async fn project_delayed(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ScoreChange>> {
    let outcome = TrustScoreLedger::new(state.store())
        .record_project_delayed(&id, &actor)
        .await?;
    applied_or_not_found(outcome, id)
}

fn applied_or_not_found(outcome: LedgerOutcome, id: String) -> AppResult<Json<ScoreChange>> {
    match outcome {
        LedgerOutcome::Applied(change) => Ok(Json(change)),
        LedgerOutcome::ProjectNotFound => Err(AppError::not_found("Project", id)),
    }
}

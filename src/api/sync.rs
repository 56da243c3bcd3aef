//! Directory reconciliation endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use super::ApiResult;
use crate::db::SyncReport;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub report: SyncReport,
}

/// GET /api/sync-users - Run a reconciliation pass on demand.
pub async fn sync_users(State(state): State<AppState>) -> ApiResult<SyncResponse> {
    let report = state
        .repo
        .reconcile_directory()
        .await
        .map_err(|e| e.or_generic("Failed to sync users from employees"))?;

    Ok(Json(SyncResponse {
        message: "Users synced from employees successfully".to_string(),
        report,
    }))
}

/// Reconcile after a committed employee write. The write already succeeded,
/// so a failing pass is logged rather than returned.
pub(super) async fn reconcile_after_write(state: &AppState, trigger: &str) {
    if let Err(e) = state.repo.reconcile_directory().await {
        tracing::warn!(trigger, "Reconciliation after write failed: {}", e);
    }
}

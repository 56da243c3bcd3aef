//! Report API endpoints.

use axum::{extract::State, Json};

use super::{message, require, ApiJson, ApiPath, ApiResult, MessageResponse};
use crate::errors::AppError;
use crate::models::{CreateReportRequest, Report, UpdateReportRequest};
use crate::AppState;

/// GET /api/reports - List all reports.
pub async fn list_reports(State(state): State<AppState>) -> ApiResult<Vec<Report>> {
    let reports = state
        .repo
        .list_reports()
        .await
        .map_err(|e| e.or_generic("Failed to fetch reports"))?;
    Ok(Json(reports))
}

/// GET /api/reports/:id - Get a single report.
pub async fn get_report(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<Report> {
    match state.repo.get_report(id).await {
        Ok(Some(report)) => Ok(Json(report)),
        Ok(None) => Err(AppError::NotFound("Report not found".to_string())),
        Err(e) => Err(e.or_generic("Failed to fetch report")),
    }
}

/// POST /api/reports - Create a report. Unrecognized fields are stored and echoed back.
pub async fn create_report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateReportRequest>,
) -> ApiResult<Report> {
    require(&request.title, "Report title is required")?;

    let report = state
        .repo
        .create_report(&request)
        .await
        .map_err(|e| e.or_generic("Failed to add report"))?;

    tracing::info!(report_id = report.id, "Created report");
    Ok(Json(report))
}

/// PUT /api/reports/:id - Update a report.
pub async fn update_report(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateReportRequest>,
) -> ApiResult<Report> {
    if let Some(title) = &request.title {
        require(title, "Report title is required")?;
    }

    let report = state
        .repo
        .update_report(id, &request)
        .await
        .map_err(|e| e.or_generic("Failed to update report"))?;

    Ok(Json(report))
}

/// DELETE /api/reports/:id - Delete a report.
pub async fn delete_report(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    state
        .repo
        .delete_report(id)
        .await
        .map_err(|e| e.or_generic("Failed to delete report"))?;

    message("Report deleted successfully")
}

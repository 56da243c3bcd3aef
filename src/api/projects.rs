//! Project API endpoints.

use axum::{extract::State, Json};

use super::{message, require, ApiJson, ApiPath, ApiResult, MessageResponse};
use crate::errors::AppError;
use crate::models::{is_valid_date, CreateProjectRequest, Project, ProjectView, UpdateProjectRequest};
use crate::AppState;

/// GET /api/projects - List projects with responsible names resolved.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<ProjectView>> {
    let projects = state
        .repo
        .list_projects()
        .await
        .map_err(|e| e.or_generic("Failed to fetch projects"))?;
    Ok(Json(projects))
}

/// GET /api/projects/:id - Get a single project.
pub async fn get_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ProjectView> {
    match state.repo.get_project(id).await {
        Ok(Some(project)) => Ok(Json(project)),
        Ok(None) => Err(AppError::NotFound("Project not found".to_string())),
        Err(e) => Err(e.or_generic("Failed to fetch project")),
    }
}

/// POST /api/projects - Create a project under a caller-supplied id.
pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProjectRequest>,
) -> ApiResult<Project> {
    let id = request
        .id
        .ok_or_else(|| AppError::Validation("Project id is required".to_string()))?;
    require(&request.name, "Project name is required")?;
    validate_dates(request.start_date.as_deref(), request.end_date.as_deref())?;

    let project = state
        .repo
        .create_project(id, &request)
        .await
        .map_err(|e| e.or_generic("Failed to add project"))?;

    tracing::info!(project_id = project.id, "Created project");
    Ok(Json(project))
}

/// PUT /api/projects/:id - Update a project.
pub async fn update_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateProjectRequest>,
) -> ApiResult<ProjectView> {
    if let Some(name) = &request.name {
        require(name, "Project name is required")?;
    }
    validate_dates(request.start_date.as_deref(), request.end_date.as_deref())?;

    let project = state
        .repo
        .update_project(id, &request)
        .await
        .map_err(|e| e.or_generic("Failed to update project"))?;

    Ok(Json(project))
}

/// DELETE /api/projects/:id - Delete a project.
pub async fn delete_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    state
        .repo
        .delete_project(id)
        .await
        .map_err(|e| e.or_generic("Failed to delete project"))?;

    message("Project deleted successfully")
}

fn validate_dates(start: Option<&str>, end: Option<&str>) -> Result<(), AppError> {
    for date in [start, end].into_iter().flatten() {
        if !is_valid_date(date) {
            return Err(AppError::Validation(format!("Invalid date '{}'", date)));
        }
    }
    Ok(())
}

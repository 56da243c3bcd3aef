//! Department API endpoints.

use axum::{extract::State, Json};

use super::{message, require, ApiJson, ApiPath, ApiResult, MessageResponse};
use crate::errors::AppError;
use crate::models::{CreateDepartmentRequest, Department, UpdateDepartmentRequest};
use crate::AppState;

/// GET /api/departments - List all departments.
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let departments = state
        .repo
        .list_departments()
        .await
        .map_err(|e| e.or_generic("Failed to fetch departments"))?;
    Ok(Json(departments))
}

/// GET /api/departments/:id - Get a single department.
pub async fn get_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Department> {
    match state.repo.get_department(id).await {
        Ok(Some(department)) => Ok(Json(department)),
        Ok(None) => Err(AppError::NotFound("Department not found".to_string())),
        Err(e) => Err(e.or_generic("Failed to fetch department")),
    }
}

/// POST /api/departments - Create a department.
pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateDepartmentRequest>,
) -> ApiResult<Department> {
    require(&request.name, "Department name is required")?;

    let department = state
        .repo
        .create_department(&request)
        .await
        .map_err(|e| e.or_generic("Failed to add department"))?;

    tracing::info!(department_id = department.id, "Created department");
    Ok(Json(department))
}

/// PUT /api/departments/:id - Update a department.
pub async fn update_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateDepartmentRequest>,
) -> ApiResult<Department> {
    if let Some(name) = &request.name {
        require(name, "Department name is required")?;
    }

    let department = state
        .repo
        .update_department(id, &request)
        .await
        .map_err(|e| e.or_generic("Failed to update department"))?;

    Ok(Json(department))
}

/// DELETE /api/departments/:id - Delete a department that has no employees.
pub async fn delete_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    state
        .repo
        .delete_department(id)
        .await
        .map_err(|e| e.or_generic("Failed to delete department"))?;

    message("Department deleted successfully")
}

//! User API endpoints.

use axum::{extract::State, Json};

use super::{check_role_change, message, require, validate_email, ApiJson, ApiPath, ApiResult, MessageResponse};
use crate::auth::CurrentUser;
use crate::directory::{normalize_role, RecordKind};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::AppState;

/// GET /api/users - List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state
        .repo
        .list_users()
        .await
        .map_err(|e| e.or_generic("Failed to fetch users"))?;
    Ok(Json(users))
}

/// GET /api/users/:id - Get a single user.
pub async fn get_user(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<User> {
    match state.repo.get_user(id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(AppError::NotFound("User not found".to_string())),
        Err(e) => Err(e.or_generic("Failed to fetch user")),
    }
}

/// POST /api/users - Create a user. No employee is created for it.
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<CreateUserRequest>,
) -> ApiResult<User> {
    require(&request.name, "Name is required")?;
    validate_email(&request.email)?;
    require(&request.password, "Password is required")?;
    request.role = request
        .role
        .as_deref()
        .map(normalize_role)
        .filter(|role| !role.is_empty());

    let user = state
        .repo
        .create_user(&request)
        .await
        .map_err(|e| e.or_generic("Failed to add user"))?;

    tracing::info!(user_id = user.id, "Created user");
    Ok(Json(user))
}

/// PUT /api/users/:id - Update a user; a role change is pushed to the paired employee.
pub async fn update_user(
    State(state): State<AppState>,
    actor: Option<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut request): ApiJson<UpdateUserRequest>,
) -> ApiResult<User> {
    check_role_change(actor.as_ref(), id, request.role.is_some(), RecordKind::User)?;

    if let Some(name) = &request.name {
        require(name, "Name is required")?;
    }
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if let Some(password) = &request.password {
        require(password, "Password cannot be empty")?;
    }
    request.role = request.role.as_deref().map(normalize_role);
    if let Some(role) = &request.role {
        require(role, "Role cannot be empty")?;
    }

    let user = state
        .repo
        .update_user(id, &request)
        .await
        .map_err(|e| e.or_generic("Failed to update user"))?;

    Ok(Json(user))
}

/// DELETE /api/users/:id - Delete a user and its paired employee.
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    state
        .repo
        .delete_user(id)
        .await
        .map_err(|e| e.or_generic("Failed to delete user"))?;

    message("User and corresponding employee deleted successfully")
}

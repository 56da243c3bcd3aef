//! Login endpoint.

use axum::{extract::State, Json};

use super::{ApiJson, ApiResult};
use crate::auth::constant_time_compare;
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/login - Check credentials and issue a bearer token.
///
/// The first user whose email and password both match is logged in. Unknown
/// email and wrong password produce the same response. Passwords are
/// stored and compared in plaintext; there is no hashing, lockout or rate
/// limiting.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let candidates = state
        .repo
        .find_users_by_email(email)
        .await
        .map_err(|e| e.or_generic("Internal server error"))?;

    let Some(user) = candidates
        .into_iter()
        .find(|user| constant_time_compare(password, &user.password))
    else {
        tracing::warn!("Failed login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| e.or_generic("Internal server error"))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        name: user.name,
        token,
    }))
}

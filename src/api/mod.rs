//! REST API module.
//!
//! Handlers return the record (or an array of records) directly on success
//! and `{ "error": "<message>" }` on failure.

mod departments;
mod employees;
mod login;
mod projects;
mod reports;
mod sync;
mod users;

pub use departments::*;
pub use employees::*;
pub use login::*;
pub use projects::*;
pub use reports::*;
pub use sync::*;
pub use users::*;

use axum::extract::{FromRequest, FromRequestParts};
use axum::Json;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::directory::{authorize_role_change, RecordKind};
use crate::errors::AppError;

/// JSON body extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Confirmation body for deletions and maintenance endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create a confirmation response.
pub fn message(text: &str) -> ApiResult<MessageResponse> {
    Ok(Json(MessageResponse {
        message: text.to_string(),
    }))
}

/// Reject a blank required field.
fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    require(email, "Email is required")?;
    if !email.contains('@') {
        return Err(AppError::Validation("Email is invalid".to_string()));
    }
    Ok(())
}

/// Apply the role-change rule to an update of `target_id`.
///
/// Updates without a role need no acting user. A role change does, and is
/// refused with 403 unless the acting user is an admin.
fn check_role_change(
    actor: Option<&CurrentUser>,
    target_id: i64,
    payload_has_role: bool,
    kind: RecordKind,
) -> Result<(), AppError> {
    if !payload_has_role {
        return Ok(());
    }

    let actor = actor.ok_or_else(|| {
        AppError::Unauthorized("Authentication required to change roles".to_string())
    })?;

    authorize_role_change(&actor.role, actor.id, target_id, payload_has_role, kind).map_err(
        |denial| {
            tracing::warn!(
                actor_id = actor.id,
                actor = %actor.email,
                target_id,
                "Role change denied: {}",
                denial
            );
            AppError::Forbidden(denial.to_string())
        },
    )
}

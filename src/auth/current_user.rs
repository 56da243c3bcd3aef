//! Acting-user extractor.

use axum::extract::OptionalFromRequestParts;
use axum::http::{header, request::Parts};

use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

/// The user performing a request, resolved from a bearer token.
///
/// The role is read back from the store, so a role change takes effect on the
/// next request rather than at the next login.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Extracted as `Option<CurrentUser>`: no `Authorization` header yields
/// `None`, a header that does not resolve to a user is rejected with 401.
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(Some(user.clone()));
        }

        let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let claims = state.tokens.verify(token).inspect_err(|_| {
            tracing::warn!(uri = %parts.uri, "Rejected bearer token");
        })?;
        let user_id = claims.user_id()?;

        let user = state
            .repo
            .get_user(user_id)
            .await
            .map_err(|e| e.or_generic("Failed to resolve acting user"))?
            .ok_or_else(|| {
                tracing::warn!(user_id, "Token refers to a user that no longer exists");
                AppError::Unauthorized("Invalid token".to_string())
            })?;

        let current = CurrentUser::from(user);
        parts.extensions.insert(current.clone());
        Ok(Some(current))
    }
}

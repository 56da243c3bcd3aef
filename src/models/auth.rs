//! Login request/response bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Minimal identity returned to clients, plus the bearer token that
/// identifies the acting user on later requests.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub name: String,
    pub token: String,
}

//! Data models for the HR directory.
//!
//! Field names follow the JSON contract used by the web and mobile clients.

mod auth;
mod department;
mod employee;
mod project;
mod report;
mod user;

pub use auth::*;
pub use department::*;
pub use employee::*;
pub use project::*;
pub use report::*;
pub use user::*;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// A record reference as sent by the clients: a number, a numeric string, or
/// an empty string meaning "not set".
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Number(i64),
    Text(String),
}

/// Deserialize an optional id that may arrive as a number or a numeric string.
pub fn loose_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LooseId::Number(id)) => Ok(Some(id)),
        Some(LooseId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(LooseId::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid id '{}'", text))),
    }
}

//! Project model and its name-resolved view.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::loose_id;

/// A project owned by a department and, optionally, an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_responsible: Option<i64>,
    /// Cleared when the referenced employee is deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_responsible: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A project with the responsible employee and department names attached.
/// Unresolved references yield an empty name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub employee_responsible_name: String,
    pub department_responsible_name: String,
}

/// Request body for creating a project. The id is always caller-supplied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub department_responsible: Option<i64>,
    #[serde(default, deserialize_with = "loose_id")]
    pub employee_responsible: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Request body for updating a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub department_responsible: Option<i64>,
    #[serde(default, deserialize_with = "loose_id")]
    pub employee_responsible: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Accepts a calendar date (`2024-03-01`) or a full RFC 3339 timestamp.
pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

//! HR employee record.

use serde::{Deserialize, Serialize};

use super::loose_id;

/// An employee. `role` is either `admin` or `employee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub mail: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<i64>,
}

/// Request body for creating an employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "email")]
    pub mail: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Department id
    #[serde(default, deserialize_with = "loose_id")]
    pub department: Option<i64>,
}

/// Request body for updating an employee. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "email")]
    pub mail: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub department: Option<i64>,
}

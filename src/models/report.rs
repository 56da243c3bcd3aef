//! Report model. Reports carry a small fixed schema plus arbitrary extra fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::loose_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Ad hoc fields such as `authorId`, `type` or `status`, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for creating a report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub generated_by: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for updating a report. Extra fields are merged key by key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub generated_by: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys that belong to the fixed schema (or to the store) and must never be
/// kept among the extra fields.
const RESERVED_FIELDS: &[&str] = &["id", "_id", "title", "generatedBy", "date", "content"];

/// Drop schema-owned keys from a set of ad hoc report fields.
pub fn strip_reserved_fields(extra: &mut Map<String, Value>) {
    for key in RESERVED_FIELDS {
        extra.remove(*key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_collects_extra_fields() {
        let request: UpdateReportRequest = serde_json::from_value(json!({
            "id": 4,
            "title": "Q3",
            "status": "draft",
            "authorId": 1
        }))
        .unwrap();

        assert_eq!(request.title.as_deref(), Some("Q3"));
        let mut extra = request.extra;
        strip_reserved_fields(&mut extra);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["status"], "draft");
        assert_eq!(extra["authorId"], 1);
    }

    #[test]
    fn test_report_serializes_extra_fields_inline() {
        let mut extra = Map::new();
        extra.insert("type".to_string(), json!("monthly"));
        let report = Report {
            id: 1,
            title: "R".to_string(),
            generated_by: None,
            date: Some("2024-01-31".to_string()),
            content: None,
            extra,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "monthly");
        assert!(json.get("content").is_none());
    }
}

//! Report collection.

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;
use crate::errors::AppError;
use crate::models::{strip_reserved_fields, CreateReportRequest, Report, UpdateReportRequest};

impl Repository {
    /// List all reports.
    pub async fn list_reports(&self) -> Result<Vec<Report>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, generated_by, date, content, extra FROM reports ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(report_from_row).collect())
    }

    /// Get a report by ID.
    pub async fn get_report(&self, id: i64) -> Result<Option<Report>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, generated_by, date, content, extra FROM reports WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(report_from_row))
    }

    /// Create a new report. The date defaults to the current time.
    pub async fn create_report(&self, request: &CreateReportRequest) -> Result<Report, AppError> {
        let date = request
            .date
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        let mut extra = request.extra.clone();
        strip_reserved_fields(&mut extra);

        let row = sqlx::query(
            "INSERT INTO reports (id, title, generated_by, date, content, extra) \
             VALUES (COALESCE(?, (SELECT COALESCE(MAX(id), 0) + 1 FROM reports)), ?, ?, ?, ?, ?) \
             RETURNING id",
        )
        .bind(request.id)
        .bind(&request.title)
        .bind(&request.generated_by)
        .bind(&date)
        .bind(&request.content)
        .bind(extra_to_json(&extra)?)
        .fetch_one(&self.pool)
        .await?;

        Ok(Report {
            id: row.get("id"),
            title: request.title.clone(),
            generated_by: request.generated_by.clone(),
            date: Some(date),
            content: request.content.clone(),
            extra,
        })
    }

    /// Update a report, merging extra fields into the stored ones.
    pub async fn update_report(
        &self,
        id: i64,
        request: &UpdateReportRequest,
    ) -> Result<Report, AppError> {
        let existing = self
            .get_report(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        let mut extra = existing.extra;
        extra.extend(request.extra.clone());
        strip_reserved_fields(&mut extra);

        let report = Report {
            id,
            title: request.title.clone().unwrap_or(existing.title),
            generated_by: request.generated_by.clone().or(existing.generated_by),
            date: request.date.clone().or(existing.date),
            content: request.content.clone().or(existing.content),
            extra,
        };

        sqlx::query(
            "UPDATE reports SET title = ?, generated_by = ?, date = ?, content = ?, extra = ? WHERE id = ?",
        )
        .bind(&report.title)
        .bind(&report.generated_by)
        .bind(&report.date)
        .bind(&report.content)
        .bind(extra_to_json(&report.extra)?)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(report)
    }

    /// Delete a report.
    pub async fn delete_report(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Report not found".to_string()));
        }

        Ok(())
    }
}

fn extra_to_json(extra: &Map<String, Value>) -> Result<Option<String>, AppError> {
    if extra.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(extra)
        .map(Some)
        .map_err(|e| AppError::Internal(format!("Failed to encode report fields: {}", e)))
}

fn report_from_row(row: &SqliteRow) -> Report {
    let extra_str: Option<String> = row.get("extra");
    Report {
        id: row.get("id"),
        title: row.get("title"),
        generated_by: row.get("generated_by"),
        date: row.get("date"),
        content: row.get("content"),
        extra: extra_str
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
    }
}

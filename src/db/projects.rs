//! Project collection.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;
use crate::errors::AppError;
use crate::models::{CreateProjectRequest, Project, ProjectView, UpdateProjectRequest};

const PROJECT_VIEW_QUERY: &str = r#"
    SELECT p.id, p.name, p.description, p.department_responsible, p.employee_responsible,
           p.start_date, p.end_date,
           COALESCE(e.name, '') AS employee_responsible_name,
           COALESCE(d.name, '') AS department_responsible_name
    FROM projects p
    LEFT JOIN employees e ON e.id = p.employee_responsible
    LEFT JOIN departments d ON d.id = p.department_responsible
"#;

impl Repository {
    /// List all projects with responsible names resolved.
    pub async fn list_projects(&self) -> Result<Vec<ProjectView>, AppError> {
        let rows = sqlx::query(&format!("{} ORDER BY p.id", PROJECT_VIEW_QUERY))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(project_view_from_row).collect())
    }

    /// Get a project by ID with responsible names resolved.
    pub async fn get_project(&self, id: i64) -> Result<Option<ProjectView>, AppError> {
        let row = sqlx::query(&format!("{} WHERE p.id = ?", PROJECT_VIEW_QUERY))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(project_view_from_row))
    }

    /// Create a project under the caller-supplied id.
    pub async fn create_project(
        &self,
        id: i64,
        request: &CreateProjectRequest,
    ) -> Result<Project, AppError> {
        sqlx::query(
            "INSERT INTO projects (id, name, description, department_responsible, employee_responsible, start_date, end_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.department_responsible)
        .bind(request.employee_responsible)
        .bind(&request.start_date)
        .bind(&request.end_date)
        .execute(&self.pool)
        .await?;

        Ok(Project {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            department_responsible: request.department_responsible,
            employee_responsible: request.employee_responsible,
            start_date: request.start_date.clone(),
            end_date: request.end_date.clone(),
        })
    }

    /// Update a project.
    pub async fn update_project(
        &self,
        id: i64,
        request: &UpdateProjectRequest,
    ) -> Result<ProjectView, AppError> {
        let existing = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?
            .project;

        sqlx::query(
            "UPDATE projects SET name = ?, description = ?, department_responsible = ?, \
             employee_responsible = ?, start_date = ?, end_date = ? WHERE id = ?",
        )
        .bind(request.name.as_ref().unwrap_or(&existing.name))
        .bind(request.description.clone().or(existing.description))
        .bind(request.department_responsible.or(existing.department_responsible))
        .bind(request.employee_responsible.or(existing.employee_responsible))
        .bind(request.start_date.clone().or(existing.start_date))
        .bind(request.end_date.clone().or(existing.end_date))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    /// Delete a project.
    pub async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        Ok(())
    }
}

fn project_view_from_row(row: &SqliteRow) -> ProjectView {
    ProjectView {
        project: Project {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            department_responsible: row.get("department_responsible"),
            employee_responsible: row.get("employee_responsible"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
        },
        employee_responsible_name: row.get("employee_responsible_name"),
        department_responsible_name: row.get("department_responsible_name"),
    }
}

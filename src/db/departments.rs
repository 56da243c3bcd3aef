//! Department collection and its referential guard.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;
use crate::errors::AppError;
use crate::models::{CreateDepartmentRequest, Department, UpdateDepartmentRequest};

impl Repository {
    /// List all departments.
    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let rows = sqlx::query("SELECT id, name, description FROM departments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(department_from_row).collect())
    }

    /// Get a department by ID.
    pub async fn get_department(&self, id: i64) -> Result<Option<Department>, AppError> {
        let row = sqlx::query("SELECT id, name, description FROM departments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(department_from_row))
    }

    /// Create a new department.
    pub async fn create_department(
        &self,
        request: &CreateDepartmentRequest,
    ) -> Result<Department, AppError> {
        let row = sqlx::query(
            "INSERT INTO departments (id, name, description) \
             VALUES (COALESCE(?, (SELECT COALESCE(MAX(id), 0) + 1 FROM departments)), ?, ?) \
             RETURNING id",
        )
        .bind(request.id)
        .bind(&request.name)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(Department {
            id: row.get("id"),
            name: request.name.clone(),
            description: request.description.clone(),
        })
    }

    /// Update a department.
    pub async fn update_department(
        &self,
        id: i64,
        request: &UpdateDepartmentRequest,
    ) -> Result<Department, AppError> {
        let existing = self
            .get_department(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;

        let department = Department {
            id,
            name: request.name.clone().unwrap_or(existing.name),
            description: request.description.clone().or(existing.description),
        };

        sqlx::query("UPDATE departments SET name = ?, description = ? WHERE id = ?")
            .bind(&department.name)
            .bind(&department.description)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(department)
    }

    /// Delete a department that no employee is assigned to.
    pub async fn delete_department(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.begin_write().await?;

        let assigned: i64 = sqlx::query("SELECT COUNT(*) AS assigned FROM employees WHERE department = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
            .get("assigned");

        if assigned > 0 {
            tracing::debug!(department_id = id, assigned, "Refusing to delete department in use");
            return Err(AppError::Validation(
                "Cannot delete department: employees are assigned to this department".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Department not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}

fn department_from_row(row: &SqliteRow) -> Department {
    Department {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
    }
}

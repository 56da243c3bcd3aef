//! Employee collection and the cascades that keep users and projects consistent.

use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use super::repository::ensure_department;
use super::Repository;
use crate::directory::{to_user_role, EMPLOYEE_ROLE};
use crate::errors::AppError;
use crate::models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};

impl Repository {
    /// List all employees.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, mail, password, role, department FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(employee_from_row).collect())
    }

    /// Get an employee by ID.
    pub async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, mail, password, role, department FROM employees WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(employee_from_row))
    }

    /// Create a new employee. The mirrored user is created by the next
    /// reconciliation pass.
    pub async fn create_employee(
        &self,
        request: &CreateEmployeeRequest,
    ) -> Result<Employee, AppError> {
        let mut tx = self.begin_write().await?;
        ensure_department(&mut *tx, request.department).await?;

        let role = request
            .role
            .clone()
            .unwrap_or_else(|| EMPLOYEE_ROLE.to_string());

        let row = sqlx::query(
            "INSERT INTO employees (id, name, mail, password, role, department) \
             VALUES (COALESCE(?, (SELECT COALESCE(MAX(id), 0) + 1 FROM employees)), ?, ?, ?, ?, ?) \
             RETURNING id",
        )
        .bind(request.id)
        .bind(&request.name)
        .bind(&request.mail)
        .bind(&request.password)
        .bind(&role)
        .bind(request.department)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Employee {
            id: row.get("id"),
            name: request.name.clone(),
            mail: request.mail.clone(),
            password: request.password.clone(),
            role,
            department: request.department,
        })
    }

    /// Update an employee. A role change is pushed to the mirrored user in
    /// the same transaction.
    pub async fn update_employee(
        &self,
        id: i64,
        request: &UpdateEmployeeRequest,
    ) -> Result<Employee, AppError> {
        let mut tx = self.begin_write().await?;
        ensure_department(&mut *tx, request.department).await?;

        let existing = fetch_employee(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        let employee = Employee {
            id,
            name: request.name.clone().unwrap_or(existing.name),
            mail: request.mail.clone().unwrap_or(existing.mail),
            password: request.password.clone().unwrap_or(existing.password),
            role: request.role.clone().unwrap_or(existing.role),
            department: request.department.or(existing.department),
        };

        sqlx::query(
            "UPDATE employees SET name = ?, mail = ?, password = ?, role = ?, department = ? WHERE id = ?",
        )
        .bind(&employee.name)
        .bind(&employee.mail)
        .bind(&employee.password)
        .bind(&employee.role)
        .bind(employee.department)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(role) = &request.role {
            let user_role = to_user_role(role);
            sqlx::query("UPDATE users SET role = ? WHERE id = ?")
                .bind(&user_role)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tracing::debug!(employee_id = id, role = %user_role, "Pushed role to user");
        }

        tx.commit().await?;
        Ok(employee)
    }

    /// Delete an employee, release the projects it was responsible for and
    /// remove its mirrored user.
    pub async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.begin_write().await?;

        let released = sqlx::query(
            "UPDATE projects SET employee_responsible = NULL WHERE employee_responsible = ?",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Employee not found".to_string()));
        }

        let users = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        tracing::info!(
            employee_id = id,
            projects_released = released,
            user_removed = users > 0,
            "Deleted employee"
        );
        Ok(())
    }
}

/// Read an employee inside an open transaction.
async fn fetch_employee(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Employee>, AppError> {
    let row = sqlx::query(
        "SELECT id, name, mail, password, role, department FROM employees WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(employee_from_row))
}

fn employee_from_row(row: &SqliteRow) -> Employee {
    Employee {
        id: row.get("id"),
        name: row.get("name"),
        mail: row.get("mail"),
        password: row.get("password"),
        role: row.get("role"),
        department: row.get("department"),
    }
}

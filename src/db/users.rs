//! User collection.

use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use super::Repository;
use crate::directory::{parse_employee_role, to_employee_role};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};

impl Repository {
    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT id, name, email, role, password FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, name, email, role, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get every user registered under an email address, lowest id first.
    ///
    /// Emails are not unique across users.
    pub async fn find_users_by_email(&self, email: &str) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, role, password FROM users WHERE email = ? ORDER BY id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Create a new user, allocating the next id when none is supplied.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, AppError> {
        let role = request
            .role
            .clone()
            .unwrap_or_else(|| crate::directory::USER_ROLE.to_string());

        let row = sqlx::query(
            "INSERT INTO users (id, name, email, role, password) \
             VALUES (COALESCE(?, (SELECT COALESCE(MAX(id), 0) + 1 FROM users)), ?, ?, ?, ?) \
             RETURNING id",
        )
        .bind(request.id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&role)
        .bind(&request.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(User {
            id: row.get("id"),
            name: request.name.clone(),
            email: request.email.clone(),
            role,
            password: request.password.clone(),
        })
    }

    /// Update a user. A role change is pushed to the paired employee in the
    /// same transaction.
    pub async fn update_user(&self, id: i64, request: &UpdateUserRequest) -> Result<User, AppError> {
        let mut tx = self.begin_write().await?;

        let existing = fetch_user(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let user = User {
            id,
            name: request.name.clone().unwrap_or(existing.name),
            email: request.email.clone().unwrap_or(existing.email),
            role: request.role.clone().unwrap_or(existing.role),
            password: request.password.clone().unwrap_or(existing.password),
        };

        sqlx::query("UPDATE users SET name = ?, email = ?, role = ?, password = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.role)
            .bind(&user.password)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(role) = &request.role {
            let employee_role = to_employee_role(role);
            let paired = sqlx::query("SELECT 1 FROM employees WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .is_some();

            if paired {
                let employee_role = parse_employee_role(&employee_role).ok_or_else(|| {
                    AppError::Validation(format!("Role '{}' cannot be applied to an employee", role))
                })?;
                sqlx::query("UPDATE employees SET role = ? WHERE id = ?")
                    .bind(employee_role)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                tracing::debug!(user_id = id, role = employee_role, "Pushed role to employee");
            }
        }

        tx.commit().await?;
        Ok(user)
    }

    /// Delete a user together with its paired employee.
    ///
    /// Projects that reference the employee keep their reference.
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.begin_write().await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let employees = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        tracing::info!(user_id = id, employee_removed = employees > 0, "Deleted user");
        Ok(())
    }
}

/// Read a user inside an open transaction.
pub(super) async fn fetch_user(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<User>, AppError> {
    let row = sqlx::query("SELECT id, name, email, role, password FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Write all mirrored fields of a user, inserting it when absent.
pub(super) async fn upsert_user(conn: &mut SqliteConnection, user: &User) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO users (id, name, email, role, password) VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email, \
         role = excluded.role, password = excluded.password",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.role)
    .bind(&user.password)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: row.get("role"),
        password: row.get("password"),
    }
}

//! Database repository for CRUD operations.
//!
//! Operations for each collection live in their own module as further
//! `impl Repository` blocks. Multi-step writes run in a single transaction.

use sqlx::sqlite::SqliteConnection;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::errors::AppError;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a transaction that holds the write lock from its first statement.
    ///
    /// A deferred transaction that reads before writing cannot be upgraded
    /// once another connection has committed, and fails with SQLITE_BUSY
    /// without waiting on the busy timeout.
    pub(super) async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}

/// Check that a department id refers to an existing department.
pub(super) async fn department_exists(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<bool, AppError> {
    let row = sqlx::query("SELECT 1 FROM departments WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// Reject a department reference that does not resolve.
pub(super) async fn ensure_department(
    conn: &mut SqliteConnection,
    id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(id) = id {
        if !department_exists(conn, id).await? {
            return Err(AppError::Validation("Invalid department id".to_string()));
        }
    }
    Ok(())
}

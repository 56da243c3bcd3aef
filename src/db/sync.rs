//! Reconciliation of the user collection against the employee collection.

use serde::Serialize;

use super::users::{fetch_user, upsert_user};
use super::Repository;
use crate::directory::{mirror_differs, mirrored_user};
use crate::errors::AppError;
use crate::models::Employee;

/// Outcome counters of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub examined: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl SyncReport {
    /// Number of user records written during the pass.
    pub fn writes(&self) -> usize {
        self.created + self.updated
    }
}

enum MirrorOutcome {
    Created,
    Updated,
    Unchanged,
}

impl Repository {
    /// Bring every employee's mirrored user in line with the employee.
    ///
    /// Missing users are created and drifted ones overwritten; users are
    /// never deleted here. Each employee is handled on its own: a failure is
    /// logged and counted and the pass moves on.
    pub async fn reconcile_directory(&self) -> Result<SyncReport, AppError> {
        let employees = self.list_employees().await?;
        let mut report = SyncReport::default();

        for employee in &employees {
            report.examined += 1;
            match self.mirror_employee(employee).await {
                Ok(MirrorOutcome::Created) => report.created += 1,
                Ok(MirrorOutcome::Updated) => report.updated += 1,
                Ok(MirrorOutcome::Unchanged) => report.unchanged += 1,
                Err(e) => {
                    tracing::warn!(employee_id = employee.id, "Failed to mirror employee: {}", e);
                    report.failed += 1;
                }
            }
        }

        if report.writes() > 0 || report.failed > 0 {
            tracing::info!(
                examined = report.examined,
                created = report.created,
                updated = report.updated,
                failed = report.failed,
                "Reconciled users with employees"
            );
        } else {
            tracing::debug!(examined = report.examined, "Users already in sync with employees");
        }

        Ok(report)
    }

    async fn mirror_employee(&self, employee: &Employee) -> Result<MirrorOutcome, AppError> {
        let mut conn = self.pool.acquire().await?;

        let outcome = match fetch_user(&mut *conn, employee.id).await? {
            None => MirrorOutcome::Created,
            Some(user) if mirror_differs(&user, employee) => MirrorOutcome::Updated,
            Some(_) => return Ok(MirrorOutcome::Unchanged),
        };

        upsert_user(&mut *conn, &mirrored_user(employee)).await?;
        Ok(outcome)
    }
}

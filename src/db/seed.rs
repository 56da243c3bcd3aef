//! Demo records for a fresh store.

use serde_json::{json, Map};

use super::Repository;
use crate::errors::AppError;
use crate::models::{
    CreateDepartmentRequest, CreateEmployeeRequest, CreateProjectRequest, CreateReportRequest,
};

/// Insert a small demo directory when no departments or employees exist yet.
///
/// Returns whether anything was inserted. Mirrored users are left to the
/// reconciliation pass that follows startup.
pub async fn seed_demo_data(repo: &Repository) -> Result<bool, AppError> {
    if !repo.list_departments().await?.is_empty() || !repo.list_employees().await?.is_empty() {
        tracing::info!("Store already populated, skipping demo data");
        return Ok(false);
    }

    for (id, name, description) in [
        (1, "HR", "Human Resources"),
        (2, "IT", "Information Technology"),
    ] {
        repo.create_department(&CreateDepartmentRequest {
            id: Some(id),
            name: name.to_string(),
            description: Some(description.to_string()),
        })
        .await?;
    }

    // Demo credentials are plaintext, like every stored password.
    for (id, name, mail, password, role, department) in [
        (1, "Admin User", "admin@example.com", "admin123", "admin", 1),
        (2, "John Doe", "john@example.com", "john123", "employee", 2),
    ] {
        repo.create_employee(&CreateEmployeeRequest {
            id: Some(id),
            name: name.to_string(),
            mail: mail.to_string(),
            password: password.to_string(),
            role: Some(role.to_string()),
            department: Some(department),
        })
        .await?;
    }

    let today = chrono::Utc::now().date_naive().to_string();
    repo.create_project(
        1,
        &CreateProjectRequest {
            id: Some(1),
            name: "Project A".to_string(),
            description: Some("Project A Description".to_string()),
            department_responsible: Some(2),
            employee_responsible: Some(2),
            start_date: Some(today.clone()),
            end_date: Some(today),
        },
    )
    .await?;

    let mut extra = Map::new();
    extra.insert("authorId".to_string(), json!(1));
    extra.insert("employeeResponsible".to_string(), json!(2));
    repo.create_report(&CreateReportRequest {
        id: Some(1),
        title: "Report 1".to_string(),
        generated_by: Some("Admin User".to_string()),
        date: None,
        content: Some("Report content here".to_string()),
        extra,
    })
    .await?;

    tracing::warn!("Inserted demo data with well-known plaintext passwords");
    Ok(true)
}

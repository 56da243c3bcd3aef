//! Employee API endpoints.
//!
//! Every successful write is followed by a reconciliation pass so the
//! mirrored users catch up.

use axum::{extract::State, Json};

use super::sync::reconcile_after_write;
use super::{check_role_change, message, require, validate_email, ApiJson, ApiPath, ApiResult, MessageResponse};
use crate::auth::CurrentUser;
use crate::directory::{parse_employee_role, RecordKind};
use crate::errors::AppError;
use crate::models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use crate::AppState;

/// GET /api/employees - List all employees.
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let employees = state
        .repo
        .list_employees()
        .await
        .map_err(|e| e.or_generic("Failed to fetch employees"))?;
    Ok(Json(employees))
}

/// GET /api/employees/:id - Get a single employee.
pub async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Employee> {
    match state.repo.get_employee(id).await {
        Ok(Some(employee)) => Ok(Json(employee)),
        Ok(None) => Err(AppError::NotFound("Employee not found".to_string())),
        Err(e) => Err(e.or_generic("Failed to fetch employee")),
    }
}

/// POST /api/employees - Create an employee and its mirrored user.
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<CreateEmployeeRequest>,
) -> ApiResult<Employee> {
    require(&request.name, "Name is required")?;
    validate_email(&request.mail)?;
    require(&request.password, "Password is required")?;
    request.role = request
        .role
        .as_deref()
        .map(employee_role)
        .transpose()?
        .map(str::to_string);

    let employee = state
        .repo
        .create_employee(&request)
        .await
        .map_err(|e| e.or_generic("Failed to add employee"))?;

    tracing::info!(employee_id = employee.id, "Created employee");
    reconcile_after_write(&state, "employee create").await;
    Ok(Json(employee))
}

/// PUT /api/employees/:id - Update an employee; a role change is pushed to the mirrored user.
pub async fn update_employee(
    State(state): State<AppState>,
    actor: Option<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut request): ApiJson<UpdateEmployeeRequest>,
) -> ApiResult<Employee> {
    check_role_change(actor.as_ref(), id, request.role.is_some(), RecordKind::Employee)?;

    if let Some(name) = &request.name {
        require(name, "Name is required")?;
    }
    if let Some(mail) = &request.mail {
        validate_email(mail)?;
    }
    if let Some(password) = &request.password {
        require(password, "Password cannot be empty")?;
    }
    request.role = request
        .role
        .as_deref()
        .map(employee_role)
        .transpose()?
        .map(str::to_string);

    let employee = state
        .repo
        .update_employee(id, &request)
        .await
        .map_err(|e| e.or_generic("Failed to update employee"))?;

    reconcile_after_write(&state, "employee update").await;
    Ok(Json(employee))
}

/// DELETE /api/employees/:id - Delete an employee, its mirrored user and its project assignments.
pub async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<MessageResponse> {
    state
        .repo
        .delete_employee(id)
        .await
        .map_err(|e| e.or_generic("Failed to delete employee"))?;

    reconcile_after_write(&state, "employee delete").await;
    message("Employee and corresponding user deleted successfully")
}

fn employee_role(role: &str) -> Result<&'static str, AppError> {
    parse_employee_role(role).ok_or_else(|| {
        AppError::Validation("Role must be either 'admin' or 'employee'".to_string())
    })
}

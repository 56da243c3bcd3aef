//! Role names and the translation between the two collections.
//!
//! Employees are `admin` or `employee`; the mirrored user calls the latter
//! `user`. Any other role string is lower-cased and passed through.

pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";
pub const EMPLOYEE_ROLE: &str = "employee";

/// Trim and lower-case a role as received from a client.
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}

/// Translate an employee role into the role of its mirrored user.
pub fn to_user_role(employee_role: &str) -> String {
    let role = normalize_role(employee_role);
    if role == EMPLOYEE_ROLE {
        USER_ROLE.to_string()
    } else {
        role
    }
}

/// Translate a user role into the role of its paired employee.
pub fn to_employee_role(user_role: &str) -> String {
    let role = normalize_role(user_role);
    if role == USER_ROLE {
        EMPLOYEE_ROLE.to_string()
    } else {
        role
    }
}

/// Parse a role for an employee record. `user` is accepted as a synonym for
/// `employee`; anything outside the employee role set is rejected.
pub fn parse_employee_role(role: &str) -> Option<&'static str> {
    match to_employee_role(role).as_str() {
        ADMIN_ROLE => Some(ADMIN_ROLE),
        EMPLOYEE_ROLE => Some(EMPLOYEE_ROLE),
        _ => None,
    }
}

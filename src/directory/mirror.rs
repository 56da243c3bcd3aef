//! The user record every employee is mirrored into.

use super::to_user_role;
use crate::models::{Employee, User};

/// Build the user an employee should be mirrored as.
pub fn mirrored_user(employee: &Employee) -> User {
    User {
        id: employee.id,
        name: employee.name.clone(),
        email: employee.mail.clone(),
        role: to_user_role(&employee.role),
        password: employee.password.clone(),
    }
}

/// Whether `user` differs from the mirror of `employee` in any mirrored field.
pub fn mirror_differs(user: &User, employee: &Employee) -> bool {
    let expected = mirrored_user(employee);
    user.name != expected.name
        || user.email != expected.email
        || user.role != expected.role
        || user.password != expected.password
}

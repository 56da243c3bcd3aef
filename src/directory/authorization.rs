//! Role-change authorization.

use std::fmt;

use super::ADMIN_ROLE;

/// Which collection a role change targets; only affects the denial message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Employee,
}

impl RecordKind {
    fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Employee => "employee",
        }
    }
}

/// Why a role change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChangeDenial {
    /// A non-admin tried to change their own role.
    OwnRole,
    /// A non-admin tried to change someone else's role.
    NotAdmin(RecordKind),
}

impl fmt::Display for RoleChangeDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleChangeDenial::OwnRole => write!(f, "Users cannot update their own role"),
            RoleChangeDenial::NotAdmin(kind) => {
                write!(f, "Only admins can update {} roles", kind.as_str())
            }
        }
    }
}

/// Decide whether `actor` may submit an update to `target_id`.
///
/// The check only applies when the payload carries a `role` field; without
/// one every update is allowed. Admins may change any role, including their
/// own. Non-admins may change no role at all.
pub fn authorize_role_change(
    actor_role: &str,
    actor_id: i64,
    target_id: i64,
    payload_has_role: bool,
    kind: RecordKind,
) -> Result<(), RoleChangeDenial> {
    if !payload_has_role || actor_role == ADMIN_ROLE {
        return Ok(());
    }
    if actor_id == target_id {
        return Err(RoleChangeDenial::OwnRole);
    }
    Err(RoleChangeDenial::NotAdmin(kind))
}

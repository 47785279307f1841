//! Role policy
//!
//! The authorization rules as a table of explicit functions rather than a
//! privilege-level comparison: the Admin/SuperAdmin relationship is a
//! carve-out (an Admin may manage everyone except SuperAdmins), not a clean
//! ordering.

use crate::auth::models::{AuthUser, Role};
use uuid::Uuid;

/// Approve, delete and list-all on user accounts.
pub fn can_manage_users(actor: Role) -> bool {
    actor.is_admin()
}

/// View a user's profile: self, or any administrative role.
pub fn can_view_user(actor: &AuthUser, target_id: Uuid) -> bool {
    actor.id == target_id || actor.role.is_admin()
}

/// Edit a user's profile fields.
///
/// Members may only edit themselves. Admins may edit anyone except a
/// SuperAdmin. SuperAdmins may edit anyone.
pub fn can_edit_user(actor: &AuthUser, target_id: Uuid, target_role: Role) -> bool {
    match actor.role {
        Role::Member => actor.id == target_id,
        Role::Admin => target_role != Role::SuperAdmin,
        Role::SuperAdmin => true,
    }
}

/// Change a user's role. Same carve-out as editing; Members never may,
/// not even on their own account.
pub fn can_change_role(actor: Role, target_role: Role) -> bool {
    match actor {
        Role::Member => false,
        Role::Admin => target_role != Role::SuperAdmin,
        Role::SuperAdmin => true,
    }
}

/// Read or mutate a training record owned by `author`.
pub fn can_access_training(actor: &AuthUser, author: &str) -> bool {
    actor.role.is_admin() || actor.display_name().eq_ignore_ascii_case(author)
}

/// Restriction applied to training list queries, before pagination.
/// `None` means an unrestricted view.
pub fn training_author_filter(actor: &AuthUser) -> Option<String> {
    match actor.role {
        Role::Member => Some(actor.display_name()),
        Role::Admin | Role::SuperAdmin => None,
    }
}

//! Access-control decisions for tickets and accounts
//!
//! Pure functions of (actor, resource). The `require_*` variants turn a
//! denial into an `AccessError::Forbidden` for use at the top of a workflow.

use crate::errors::internal::AccessError;
use crate::types::db::ticket;
use crate::types::internal::ActorContext;

pub const ADMIN_REQUIRED: &str = "Admin access required.";
pub const SUPER_ADMIN_REQUIRED: &str = "Super Admin access required.";
pub const TICKET_ACCESS_DENIED: &str = "You do not have permission to view this ticket.";
pub const COMMENT_ACCESS_DENIED: &str = "You do not have permission to comment on this ticket.";

/// Admins see every ticket; users only their own
pub fn can_view(actor: &ActorContext, ticket: &ticket::Model) -> bool {
    actor.is_admin() || actor.user_id == ticket.user_id
}

pub fn can_comment(actor: &ActorContext, ticket: &ticket::Model) -> bool {
    can_view(actor, ticket)
}

/// Any admin may edit any ticket; there is no per-assignee restriction
pub fn can_edit_fields(actor: &ActorContext, _ticket: &ticket::Model) -> bool {
    actor.is_admin()
}

pub fn can_assign(actor: &ActorContext, _ticket: &ticket::Model) -> bool {
    actor.is_admin()
}

pub fn can_manage_users(actor: &ActorContext) -> bool {
    actor.is_super_admin()
}

pub fn can_create_user(actor: &ActorContext) -> bool {
    actor.is_super_admin()
}

pub fn can_view_global_dashboard(actor: &ActorContext) -> bool {
    actor.is_super_admin()
}

fn check(allowed: bool, reason: &str) -> Result<(), AccessError> {
    if allowed {
        Ok(())
    } else {
        Err(AccessError::forbidden(reason))
    }
}

pub fn require_view(actor: &ActorContext, ticket: &ticket::Model) -> Result<(), AccessError> {
    check(can_view(actor, ticket), TICKET_ACCESS_DENIED)
}

pub fn require_comment(actor: &ActorContext, ticket: &ticket::Model) -> Result<(), AccessError> {
    check(can_comment(actor, ticket), COMMENT_ACCESS_DENIED)
}

pub fn require_edit_fields(actor: &ActorContext, ticket: &ticket::Model) -> Result<(), AccessError> {
    check(can_edit_fields(actor, ticket), ADMIN_REQUIRED)
}

pub fn require_assign(actor: &ActorContext, ticket: &ticket::Model) -> Result<(), AccessError> {
    check(can_assign(actor, ticket), ADMIN_REQUIRED)
}

/// Gate for admin-only views that are not tied to a single ticket
pub fn require_admin(actor: &ActorContext) -> Result<(), AccessError> {
    check(actor.is_admin(), ADMIN_REQUIRED)
}

pub fn require_manage_users(actor: &ActorContext) -> Result<(), AccessError> {
    check(can_manage_users(actor), SUPER_ADMIN_REQUIRED)
}

pub fn require_create_user(actor: &ActorContext) -> Result<(), AccessError> {
    check(can_create_user(actor), SUPER_ADMIN_REQUIRED)
}

pub fn require_global_dashboard(actor: &ActorContext) -> Result<(), AccessError> {
    check(can_view_global_dashboard(actor), SUPER_ADMIN_REQUIRED)
}

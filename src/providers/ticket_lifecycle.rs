//! Ticket state machine rules
//!
//! Statuses move freely between Open, In Progress, Resolved and Closed; Closed
//! is a label, not a terminal state. The functions here decide the side effects
//! of each transition and never touch the store.

use sea_orm::ActiveValue::{NotSet, Set};

use crate::errors::internal::TicketError;
use crate::types::db::{TicketCategory, TicketPriority, TicketStatus, ticket, user};

pub const UNKNOWN_SYSTEM: &str = "Unknown System";

/// Validated fields for a new ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
}

/// Validated field edit submitted by an admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketEdit {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
}

/// Creator details captured onto a ticket at creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorSnapshot {
    pub user_name: String,
    pub ip_address: Option<String>,
    pub system_name: String,
}

impl CreatorSnapshot {
    pub fn capture(
        owner: &user::Model,
        ip_address: Option<String>,
        explicit_system_name: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        Self {
            user_name: owner.full_name(),
            ip_address,
            system_name: infer_system_label(explicit_system_name, user_agent),
        }
    }
}

/// System label from the form if given, otherwise a coarse OS guess from the User-Agent
pub fn infer_system_label(explicit: Option<&str>, user_agent: Option<&str>) -> String {
    if let Some(label) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return label.to_string();
    }

    let user_agent = user_agent.unwrap_or_default();
    let label = if user_agent.contains("Windows") {
        "Windows System"
    } else if user_agent.contains("Mac") {
        "Mac System"
    } else if user_agent.contains("Linux") {
        "Linux System"
    } else {
        UNKNOWN_SYSTEM
    };

    label.to_string()
}

/// `resolved_at` after moving from `from` to `to`
///
/// Set on entry into Resolved, cleared on any status other than Resolved,
/// kept when a Resolved ticket is saved as Resolved again.
pub fn resolved_at_for_transition(
    from: TicketStatus,
    to: TicketStatus,
    current: Option<i64>,
    now: i64,
) -> Option<i64> {
    match (from, to) {
        (TicketStatus::Resolved, TicketStatus::Resolved) => current.or(Some(now)),
        (_, TicketStatus::Resolved) => Some(now),
        _ => None,
    }
}

/// Assignment advances Open tickets to In Progress and leaves later statuses alone
pub fn status_after_assignment(current: TicketStatus) -> TicketStatus {
    match current {
        TicketStatus::Open => TicketStatus::InProgress,
        other => other,
    }
}

/// Department whose admins handle a category; `None` means any admin
pub fn assignable_department(category: TicketCategory) -> Option<&'static str> {
    match category {
        TicketCategory::Hardware => Some("IT Hardware"),
        TicketCategory::Software => Some("IT Software"),
        TicketCategory::Network | TicketCategory::Other => None,
    }
}

/// Row for a freshly created ticket: always Open, never resolved
pub fn open_ticket(
    owner_id: i32,
    ticket: NewTicket,
    snapshot: CreatorSnapshot,
    now: i64,
) -> ticket::ActiveModel {
    ticket::ActiveModel {
        id: NotSet,
        title: Set(ticket.title),
        description: Set(ticket.description),
        category: Set(ticket.category),
        priority: Set(ticket.priority),
        status: Set(TicketStatus::Open),
        user_name: Set(snapshot.user_name),
        user_ip_address: Set(snapshot.ip_address),
        user_system_name: Set(Some(snapshot.system_name)),
        user_id: Set(owner_id),
        assigned_to: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        resolved_at: Set(None),
    }
}

/// Timestamp for a mutation of a ticket last changed at `previous`
///
/// Strictly later than `previous`, so two changes within the same second
/// still move `updated_at` forward.
pub fn next_updated_at(previous: i64, now: i64) -> i64 {
    now.max(previous.saturating_add(1))
}

/// Apply an admin field edit, including the `resolved_at` side effect
pub fn apply_edit(mut ticket: ticket::Model, edit: TicketEdit, now: i64) -> ticket::Model {
    let now = next_updated_at(ticket.updated_at, now);
    ticket.resolved_at =
        resolved_at_for_transition(ticket.status, edit.status, ticket.resolved_at, now);
    ticket.title = edit.title;
    ticket.description = edit.description;
    ticket.category = edit.category;
    ticket.priority = edit.priority;
    ticket.status = edit.status;
    ticket.updated_at = now;
    ticket
}

/// Assign a ticket to an administrative user
///
/// The assignee's role is checked here, at assignment time only.
pub fn apply_assignment(
    mut ticket: ticket::Model,
    assignee: &user::Model,
    now: i64,
) -> Result<ticket::Model, TicketError> {
    if !assignee.is_admin() {
        return Err(TicketError::InvalidAssignee {
            user_id: assignee.id,
        });
    }

    let now = next_updated_at(ticket.updated_at, now);
    let status = status_after_assignment(ticket.status);
    ticket.resolved_at = resolved_at_for_transition(ticket.status, status, ticket.resolved_at, now);
    ticket.status = status;
    ticket.assigned_to = Some(assignee.id);
    ticket.updated_at = now;
    Ok(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{TEST_NOW, sample_ticket, sample_user};
    use crate::types::db::Role;

    #[test]
    fn test_resolved_at_is_set_on_entry_and_cleared_on_exit() {
        assert_eq!(
            resolved_at_for_transition(TicketStatus::InProgress, TicketStatus::Resolved, None, 100),
            Some(100)
        );
        assert_eq!(
            resolved_at_for_transition(TicketStatus::Resolved, TicketStatus::InProgress, Some(100), 200),
            None
        );
        assert_eq!(
            resolved_at_for_transition(TicketStatus::Resolved, TicketStatus::Closed, Some(100), 200),
            None
        );
        assert_eq!(
            resolved_at_for_transition(TicketStatus::Resolved, TicketStatus::Resolved, Some(100), 200),
            Some(100)
        );
        assert_eq!(
            resolved_at_for_transition(TicketStatus::Open, TicketStatus::Closed, None, 200),
            None
        );
    }

    #[test]
    fn test_assignment_only_advances_open_tickets() {
        assert_eq!(status_after_assignment(TicketStatus::Open), TicketStatus::InProgress);
        for status in [TicketStatus::InProgress, TicketStatus::Resolved, TicketStatus::Closed] {
            assert_eq!(status_after_assignment(status), status);
        }
    }

    #[test]
    fn test_system_label_prefers_explicit_value() {
        assert_eq!(
            infer_system_label(Some("  LAB-PC-07 "), Some("Mozilla/5.0 (Windows NT 10.0)")),
            "LAB-PC-07"
        );
        assert_eq!(
            infer_system_label(Some(""), Some("Mozilla/5.0 (Windows NT 10.0)")),
            "Windows System"
        );
        assert_eq!(
            infer_system_label(None, Some("Mozilla/5.0 (Macintosh; Intel Mac OS X)")),
            "Mac System"
        );
        assert_eq!(infer_system_label(None, Some("Mozilla/5.0 (X11; Linux x86_64)")), "Linux System");
        assert_eq!(infer_system_label(None, Some("curl/8.0")), UNKNOWN_SYSTEM);
        assert_eq!(infer_system_label(None, None), UNKNOWN_SYSTEM);
    }

    #[test]
    fn test_category_department_lookup() {
        assert_eq!(assignable_department(TicketCategory::Hardware), Some("IT Hardware"));
        assert_eq!(assignable_department(TicketCategory::Software), Some("IT Software"));
        assert_eq!(assignable_department(TicketCategory::Network), None);
        assert_eq!(assignable_department(TicketCategory::Other), None);
    }

    #[test]
    fn test_edit_into_and_out_of_resolved() {
        let ticket = sample_ticket(5, 10);
        let edit = |status| TicketEdit {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            category: ticket.category,
            priority: ticket.priority,
            status,
        };

        let resolved = apply_edit(ticket.clone(), edit(TicketStatus::Resolved), TEST_NOW + 500);
        assert_eq!(resolved.status, TicketStatus::Resolved);
        assert_eq!(resolved.resolved_at, Some(TEST_NOW + 500));
        assert_eq!(resolved.updated_at, TEST_NOW + 500);
        assert_eq!(resolved.user_id, ticket.user_id);

        let reopened = apply_edit(resolved, edit(TicketStatus::InProgress), TEST_NOW + 600);
        assert_eq!(reopened.resolved_at, None);
        assert_eq!(reopened.updated_at, TEST_NOW + 600);
    }

    #[test]
    fn test_same_second_edits_still_advance_updated_at() {
        let ticket = sample_ticket(5, 10);
        let edit = |status| TicketEdit {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            category: ticket.category,
            priority: ticket.priority,
            status,
        };

        let resolved = apply_edit(ticket.clone(), edit(TicketStatus::Resolved), TEST_NOW);
        assert_eq!(resolved.updated_at, TEST_NOW + 1);
        assert_eq!(resolved.resolved_at, Some(resolved.updated_at));

        let closed = apply_edit(resolved.clone(), edit(TicketStatus::Closed), TEST_NOW);
        assert_eq!(closed.updated_at, TEST_NOW + 2);

        assert_eq!(next_updated_at(TEST_NOW, TEST_NOW + 30), TEST_NOW + 30);
        assert_eq!(next_updated_at(TEST_NOW, TEST_NOW - 5), TEST_NOW + 1);
    }

    #[test]
    fn test_assignment_requires_admin_assignee() {
        let ticket = sample_ticket(5, 10);
        let plain_user = sample_user(11, Role::User, None);

        assert!(matches!(
            apply_assignment(ticket.clone(), &plain_user, 100),
            Err(TicketError::InvalidAssignee { user_id: 11 })
        ));

        let admin = sample_user(20, Role::Admin, Some("IT Software"));
        let assigned = apply_assignment(ticket, &admin, TEST_NOW + 100).unwrap();
        assert_eq!(assigned.assigned_to, Some(20));
        assert_eq!(assigned.status, TicketStatus::InProgress);
        assert_eq!(assigned.updated_at, TEST_NOW + 100);
    }

    #[test]
    fn test_assigning_resolved_ticket_keeps_status_and_timestamp() {
        let mut ticket = sample_ticket(5, 10);
        ticket.status = TicketStatus::Resolved;
        ticket.resolved_at = Some(50);
        let admin = sample_user(20, Role::SuperAdmin, Some("IT"));

        let assigned = apply_assignment(ticket, &admin, 100).unwrap();

        assert_eq!(assigned.status, TicketStatus::Resolved);
        assert_eq!(assigned.resolved_at, Some(50));
    }

    #[test]
    fn test_snapshot_uses_owner_full_name() {
        let owner = sample_user(10, Role::User, Some("Engineering"));

        let snapshot = CreatorSnapshot::capture(
            &owner,
            Some("10.0.0.5".to_string()),
            None,
            Some("Mozilla/5.0 (X11; Linux x86_64)"),
        );

        assert_eq!(snapshot.user_name, owner.full_name());
        assert_eq!(snapshot.ip_address.as_deref(), Some("10.0.0.5"));
        assert_eq!(snapshot.system_name, "Linux System");
    }
}

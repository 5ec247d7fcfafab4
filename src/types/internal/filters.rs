use crate::types::db::{TicketCategory, TicketPriority, TicketStatus};

/// Filter applied to ticket scans
///
/// Every populated field narrows the result; `search` is a substring match on the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub owner_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<TicketCategory>,
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn owned_by(user_id: i32) -> Self {
        Self {
            owner_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn assigned_to(user_id: i32) -> Self {
        Self {
            assigned_to: Some(user_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Option<TicketStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Option<TicketPriority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: Option<TicketCategory>) -> Self {
        self.category = category;
        self
    }

    /// Blank search strings are ignored
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

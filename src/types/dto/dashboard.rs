use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::{TicketCategory, TicketStatus};
use crate::types::dto::ticket::TicketResponse;
use crate::types::dto::user::UserSummary;

/// Counts over the tickets assigned to the calling admin
#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AdminDashboardResponse {
    pub tickets: Vec<TicketResponse>,
    pub stats: TicketStats,
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: TicketStatus,
    pub count: u64,
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: TicketCategory,
    pub count: u64,
}

/// Super-admin view of the whole workload
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub total_tickets: u64,
    pub by_status: Vec<StatusCount>,
    pub by_category: Vec<CategoryCount>,

    /// Accounts with role user
    pub total_users: u64,

    /// Accounts with role admin
    pub total_admins: u64,

    pub recent_tickets: Vec<TicketResponse>,
}

/// Ticket plus the admins it may be routed to
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AssignWorkResponse {
    pub ticket: TicketResponse,

    /// Department the candidates were drawn from, if narrowed
    pub department: Option<String>,

    pub candidates: Vec<UserSummary>,
}

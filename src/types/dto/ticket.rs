use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::{TicketCategory, TicketPriority, TicketStatus, ticket, ticket_comment, user};
use crate::types::dto::user::UserSummary;

/// Request model for filing a ticket
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,

    /// Computer/system name; guessed from the User-Agent when omitted
    pub system_name: Option<String>,
}

/// Admin field edit, including status transitions
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTicketRequest {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub comment: String,
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct AssignTicketRequest {
    /// Id of an administrative user
    pub assigned_to: i32,
}

#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketResponse {
    pub id: i32,

    /// Display identifier, e.g. GTN-000042
    pub ticket_number: String,

    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,

    pub user_id: i32,

    /// Creator snapshot taken when the ticket was filed
    pub user_name: String,
    pub user_ip_address: Option<String>,
    pub user_system_name: Option<String>,

    pub assigned_to: Option<i32>,

    pub created_at: i64,
    pub updated_at: i64,
    pub resolved_at: Option<i64>,
}

impl From<ticket::Model> for TicketResponse {
    fn from(ticket: ticket::Model) -> Self {
        Self {
            ticket_number: ticket.ticket_number(),
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            category: ticket.category,
            priority: ticket.priority,
            status: ticket.status,
            user_id: ticket.user_id,
            user_name: ticket.user_name,
            user_ip_address: ticket.user_ip_address,
            user_system_name: ticket.user_system_name,
            assigned_to: ticket.assigned_to,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            resolved_at: ticket.resolved_at,
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub ticket_id: i32,
    pub user_id: i32,
    pub author_name: Option<String>,
    pub comment: String,
    pub created_at: i64,
}

impl From<(ticket_comment::Model, Option<user::Model>)> for CommentResponse {
    fn from((comment, author): (ticket_comment::Model, Option<user::Model>)) -> Self {
        Self {
            id: comment.id,
            ticket_id: comment.ticket_id,
            user_id: comment.user_id,
            author_name: author.map(|a| a.full_name()),
            comment: comment.comment,
            created_at: comment.created_at,
        }
    }
}

/// Ticket with its assignee and comment thread (oldest first)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TicketDetailResponse {
    pub ticket: TicketResponse,
    pub assignee: Option<UserSummary>,
    pub comments: Vec<CommentResponse>,

    /// Whether the caller may edit fields and assign
    pub can_edit: bool,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TicketListResponse {
    pub tickets: Vec<TicketResponse>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AssigneeListResponse {
    pub assignees: Vec<UserSummary>,
}

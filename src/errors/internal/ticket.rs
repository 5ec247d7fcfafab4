use thiserror::Error;

#[derive(Error, Debug)]
pub enum TicketError {
    #[error("Ticket not found: {ticket_id}")]
    NotFound { ticket_id: i32 },

    /// Assignment target is missing or lacks an administrative role
    #[error("User {user_id} cannot be assigned tickets")]
    InvalidAssignee { user_id: i32 },
}

// Database entities - SeaORM models
pub mod session;
pub mod ticket;
pub mod ticket_comment;
pub mod user;

pub use ticket::{TicketCategory, TicketPriority, TicketStatus};
pub use user::Role;

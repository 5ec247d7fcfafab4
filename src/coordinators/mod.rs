// Coordinators layer - Workflow orchestration
//
// Coordinators compose store and provider operations for specific API endpoints
// and own the transaction boundaries. Rules live in providers.

pub mod admin_coordinator;
pub mod auth_coordinator;
pub mod profile_coordinator;
pub mod ticket_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use auth_coordinator::AuthCoordinator;
pub use profile_coordinator::ProfileCoordinator;
pub use ticket_coordinator::TicketCoordinator;

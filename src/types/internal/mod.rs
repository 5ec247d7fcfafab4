// Internal types - not exposed via the API
pub mod actor;
pub mod context;
pub mod filters;

pub use actor::{ActorContext, LoginEntry};
pub use filters::TicketFilter;

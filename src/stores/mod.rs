// Stores layer - Data access and repository pattern
//
// Stores are stateless; every method takes the connection or transaction to
// run on so coordinators decide the unit of work.
pub mod session_store;
pub mod ticket_store;
pub mod user_store;

pub use session_store::SessionStore;
pub use ticket_store::TicketStore;
pub use user_store::{NewUser, ProfileUpdate, UserStore};

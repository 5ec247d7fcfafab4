// Providers layer - Work performers and business logic
//
// Providers contain the rules coordinators compose: access decisions, the
// ticket state machine, form validation, sessions, crypto and file storage.
pub mod access_policy;
pub mod crypto_provider;
pub mod file_storage;
pub mod form_validator;
pub mod session_provider;
pub mod ticket_lifecycle;

pub use crypto_provider::CryptoProvider;
pub use file_storage::{FileStorage, LocalFileStorage};
pub use session_provider::SessionProvider;

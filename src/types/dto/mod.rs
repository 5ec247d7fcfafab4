// API request and response models
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod ticket;
pub mod user;

use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::dto::user::UserResponse;

/// Request model for both login entry points
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Self-service registration; the account always gets the user role
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub password: String,

    /// Password confirmation, must equal `password`
    pub password2: String,
}

/// Where the client should go after logging in
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoginDestination {
    UserDashboard,
    AdminDashboard,
    SuperAdminDashboard,
}

/// Response model for a successful login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque session token; send as `Authorization: Bearer <token>`
    pub token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the session expires
    pub expires_in: i64,

    pub destination: LoginDestination,

    pub user: UserResponse,
}

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::{Role, user};

/// Full account view (own profile, user management)
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub department: Option<String>,
    pub role: Role,

    /// Derived from `role`
    pub is_admin: bool,

    pub ip_address: Option<String>,
    pub system_name: Option<String>,
    pub profile_image: Option<String>,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            full_name: user.full_name(),
            is_admin: user.is_admin(),
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            department: user.department,
            role: user.role,
            ip_address: user.ip_address,
            system_name: user.system_name,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

/// Short account view for assignee pickers and ticket detail
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub department: Option<String>,
    pub role: Role,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name(),
            department: user.department.clone(),
            role: user.role,
        }
    }
}

/// Super-admin user creation; any role may be granted
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub role: Role,
    pub password: String,
    pub password2: String,
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
    pub system_name: Option<String>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

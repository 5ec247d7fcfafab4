use crate::types::db::{Role, user};

/// Identity resolved from a valid session
///
/// Threaded explicitly into every access-control and lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: i32,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl ActorContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

impl From<&user::Model> for ActorContext {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            display_name: user.full_name(),
            role: user.role,
        }
    }
}

/// Login entry point a rejected request should be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginEntry {
    User,
    Admin,
}

impl LoginEntry {
    pub fn path(self) -> &'static str {
        match self {
            LoginEntry::User => "/api/auth/user-login",
            LoginEntry::Admin => "/api/auth/admin-login",
        }
    }
}

use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::types::db::{Role, user};

/// Account fields for a new user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub role: Role,
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
    pub system_name: Option<String>,
}

/// Data access for user accounts
#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new account
    ///
    /// # Errors
    /// `UserError::DuplicateUsername` / `DuplicateEmail` when either is taken
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser,
        now: i64,
    ) -> Result<user::Model, InternalError> {
        if self.find_by_username(conn, &new_user.username).await?.is_some() {
            return Err(UserError::DuplicateUsername {
                username: new_user.username,
            }
            .into());
        }
        if self.find_by_email(conn, &new_user.email).await?.is_some() {
            return Err(UserError::DuplicateEmail {
                email: new_user.email,
            }
            .into());
        }

        let username = new_user.username.clone();
        let email = new_user.email.clone();

        let active = user::ActiveModel {
            id: NotSet,
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            department: Set(new_user.department),
            role: Set(new_user.role),
            ip_address: Set(None),
            system_name: Set(None),
            profile_image: Set(None),
            created_at: Set(now),
        };

        active
            .insert(conn)
            .await
            .map_err(|e| unique_violation(e, "insert_user", &username, &email))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Like `find_by_id` but a missing user is an error
    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| UserError::UserIdNotFound { user_id }.into())
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    pub async fn find_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// Every account, newest first
    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Accounts with an administrative role (admin or super admin), by name
    pub async fn list_admins(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Role.is_in([Role::Admin, Role::SuperAdmin]))
            .order_by_asc(user::Column::FirstName)
            .order_by_asc(user::Column::LastName)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_admins", e))
    }

    /// Accounts with exactly `role`, optionally restricted to one department
    pub async fn list_by_role(
        &self,
        conn: &impl ConnectionTrait,
        role: Role,
        department: Option<&str>,
    ) -> Result<Vec<user::Model>, InternalError> {
        let mut query = user::Entity::find().filter(user::Column::Role.eq(role));
        if let Some(department) = department {
            query = query.filter(user::Column::Department.eq(department));
        }

        query
            .order_by_asc(user::Column::FirstName)
            .order_by_asc(user::Column::LastName)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users_by_role", e))
    }

    pub async fn count_by_role(&self, conn: &impl ConnectionTrait, role: Role) -> Result<u64, InternalError> {
        user::Entity::find()
            .filter(user::Column::Role.eq(role))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users_by_role", e))
    }

    pub async fn super_admin_exists(&self, conn: &impl ConnectionTrait) -> Result<bool, InternalError> {
        Ok(self.count_by_role(conn, Role::SuperAdmin).await? > 0)
    }

    pub async fn update_profile(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        update: ProfileUpdate,
    ) -> Result<user::Model, InternalError> {
        let existing = self.get_by_id(conn, user_id).await?;
        let username = existing.username.clone();
        let email = update.email.clone();

        let mut active: user::ActiveModel = existing.into();
        active.first_name = Set(update.first_name);
        active.last_name = Set(update.last_name);
        active.email = Set(update.email);
        active.department = Set(update.department);
        active.system_name = Set(update.system_name);

        active
            .update(conn)
            .await
            .map_err(|e| unique_violation(e, "update_profile", &username, &email))
    }

    pub async fn update_profile_image(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        reference: String,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = self.get_by_id(conn, user_id).await?.into();
        active.profile_image = Set(Some(reference));

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_profile_image", e))
    }

    /// Refresh last-known request metadata; a `None` system name leaves the stored one
    pub async fn update_request_metadata(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        ip_address: Option<String>,
        system_name: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = self.get_by_id(conn, user_id).await?.into();
        active.ip_address = Set(ip_address);
        if let Some(system_name) = system_name {
            active.system_name = Set(Some(system_name));
        }

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_request_metadata", e))
    }
}

/// Map a UNIQUE violation on users to the matching domain error
fn unique_violation(err: DbErr, operation: &str, username: &str, email: &str) -> InternalError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("email") => {
            UserError::DuplicateEmail {
                email: email.to_string(),
            }
            .into()
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateUsername {
            username: username.to_string(),
        }
        .into(),
        _ => InternalError::database(operation, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_user, setup_test_db};

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let created = store
            .insert(&db, new_user("alice", Role::User, None), 1_000)
            .await
            .unwrap();

        assert!(created.id > 0);
        assert!(!created.is_admin());
        assert_eq!(created.created_at, 1_000);

        let found = store.find_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(store.get_by_id(&db, created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_are_rejected() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        store.insert(&db, new_user("alice", Role::User, None), 1).await.unwrap();

        let err = store
            .insert(&db, new_user("alice", Role::User, None), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::User(UserError::DuplicateUsername { .. })));

        let mut same_email = new_user("alicia", Role::User, None);
        same_email.email = "alice@gtnengineering.com".to_string();
        let err = store.insert(&db, same_email, 3).await.unwrap_err();
        assert!(matches!(err, InternalError::User(UserError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let db = setup_test_db().await;

        let err = UserStore::new().get_by_id(&db, 404).await.unwrap_err();

        assert!(matches!(err, InternalError::User(UserError::UserIdNotFound { user_id: 404 })));
    }

    #[tokio::test]
    async fn test_role_queries() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        store.insert(&db, new_user("boss", Role::SuperAdmin, Some("IT")), 1).await.unwrap();
        store.insert(&db, new_user("hw", Role::Admin, Some("IT Hardware")), 2).await.unwrap();
        store.insert(&db, new_user("sw", Role::Admin, Some("IT Software")), 3).await.unwrap();
        store.insert(&db, new_user("plain", Role::User, None), 4).await.unwrap();

        assert!(store.super_admin_exists(&db).await.unwrap());
        assert_eq!(store.count_by_role(&db, Role::Admin).await.unwrap(), 2);
        assert_eq!(store.count_by_role(&db, Role::User).await.unwrap(), 1);
        assert_eq!(store.list_admins(&db).await.unwrap().len(), 3);
        assert_eq!(store.list_all(&db).await.unwrap().len(), 4);

        let software = store
            .list_by_role(&db, Role::Admin, Some("IT Software"))
            .await
            .unwrap();
        assert_eq!(software.len(), 1);
        assert_eq!(software[0].username, "sw");
    }

    #[tokio::test]
    async fn test_profile_and_metadata_updates() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let user = store.insert(&db, new_user("alice", Role::User, None), 1).await.unwrap();

        let updated = store
            .update_profile(
                &db,
                user.id,
                ProfileUpdate {
                    first_name: "Alicia".to_string(),
                    last_name: "Smith".to_string(),
                    email: "alicia@gtnengineering.com".to_string(),
                    department: Some("Finance".to_string()),
                    system_name: Some("FIN-LAPTOP-3".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name(), "Alicia Smith");
        assert_eq!(updated.username, "alice");

        let updated = store
            .update_request_metadata(&db, user.id, Some("10.1.2.3".to_string()), None)
            .await
            .unwrap();
        assert_eq!(updated.ip_address.as_deref(), Some("10.1.2.3"));
        assert_eq!(updated.system_name.as_deref(), Some("FIN-LAPTOP-3"));

        let updated = store
            .update_profile_image(&db, user.id, "abc_me.png".to_string())
            .await
            .unwrap();
        assert_eq!(updated.profile_image.as_deref(), Some("abc_me.png"));
    }
}

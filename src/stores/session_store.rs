use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::errors::InternalError;
use crate::types::db::session;

/// Server-side session records, keyed by the HMAC of the client token
#[derive(Debug, Default)]
pub struct SessionStore;

impl SessionStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: String,
        user_id: i32,
        created_at: i64,
        expires_at: i64,
    ) -> Result<session::Model, InternalError> {
        session::ActiveModel {
            token_hash: Set(token_hash),
            user_id: Set(user_id),
            created_at: Set(created_at),
            expires_at: Set(expires_at),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_session", e))
    }

    pub async fn find(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<Option<session::Model>, InternalError> {
        session::Entity::find_by_id(token_hash.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_session", e))
    }

    /// Returns whether a session was removed
    pub async fn delete(&self, conn: &impl ConnectionTrait, token_hash: &str) -> Result<bool, InternalError> {
        let result = session::Entity::delete_by_id(token_hash.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_expired(&self, conn: &impl ConnectionTrait, now: i64) -> Result<u64, InternalError> {
        let result = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_expired_sessions", e))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_db};
    use crate::types::db::Role;

    #[tokio::test]
    async fn test_insert_find_delete() {
        let db = setup_test_db().await;
        let store = SessionStore::new();
        let user = insert_test_user(&db, "alice", Role::User, None).await;

        store.insert(&db, "hash-1".to_string(), user.id, 100, 200).await.unwrap();

        let found = store.find(&db, "hash-1").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        assert_eq!(found.expires_at, 200);

        assert!(store.delete(&db, "hash-1").await.unwrap());
        assert!(!store.delete(&db, "hash-1").await.unwrap());
        assert!(store.find(&db, "hash-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_live_sessions() {
        let db = setup_test_db().await;
        let store = SessionStore::new();
        let user = insert_test_user(&db, "alice", Role::User, None).await;
        store.insert(&db, "old".to_string(), user.id, 0, 50).await.unwrap();
        store.insert(&db, "live".to_string(), user.id, 0, 500).await.unwrap();

        assert_eq!(store.delete_expired(&db, 100).await.unwrap(), 1);
        assert!(store.find(&db, "live").await.unwrap().is_some());
    }
}

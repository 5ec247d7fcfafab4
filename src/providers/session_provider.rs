use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::stores::{SessionStore, UserStore};
use crate::types::internal::ActorContext;

/// Issues, resolves and revokes server-side sessions
///
/// The client holds an opaque random token; only its HMAC is stored, so a
/// leaked sessions table cannot be replayed.
pub struct SessionProvider {
    db: DatabaseConnection,
    session_store: Arc<SessionStore>,
    user_store: Arc<UserStore>,
    crypto_provider: Arc<CryptoProvider>,
    ttl_seconds: i64,
}

impl SessionProvider {
    pub fn new(
        db: DatabaseConnection,
        session_store: Arc<SessionStore>,
        user_store: Arc<UserStore>,
        crypto_provider: Arc<CryptoProvider>,
        ttl_hours: i64,
    ) -> Self {
        Self {
            db,
            session_store,
            user_store,
            crypto_provider,
            ttl_seconds: ttl_hours.saturating_mul(60 * 60),
        }
    }

    /// Start a session for `user_id` and return the plaintext token
    ///
    /// Expired sessions are purged in the same unit of work.
    pub async fn create(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();
        let purged = self.session_store.delete_expired(conn, now).await?;
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }

        let token = self.crypto_provider.generate_session_token();
        let token_hash = self.crypto_provider.hash_session_token(&token);
        self.session_store
            .insert(conn, token_hash, user_id, now, now.saturating_add(self.ttl_seconds))
            .await?;

        Ok(token)
    }

    /// Map a bearer token to its session hash and actor
    ///
    /// Unknown tokens, expired sessions and sessions whose user is gone
    /// resolve to `None`.
    pub async fn resolve(&self, token: &str) -> Result<Option<(String, ActorContext)>, InternalError> {
        let token_hash = self.crypto_provider.hash_session_token(token);

        let Some(session) = self.session_store.find(&self.db, &token_hash).await? else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now().timestamp() {
            self.session_store.delete(&self.db, &token_hash).await?;
            return Ok(None);
        }

        let Some(user) = self.user_store.find_by_id(&self.db, session.user_id).await? else {
            return Ok(None);
        };

        Ok(Some((token_hash, ActorContext::from(&user))))
    }

    /// End the session identified by its hash
    pub async fn revoke(&self, conn: &impl ConnectionTrait, session_id: &str) -> Result<bool, InternalError> {
        self.session_store.delete(conn, session_id).await
    }
}

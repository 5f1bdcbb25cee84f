//! The registered user bound to an HTTP session.

use sqlx::PgPool;
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use nuvra_core::UserId;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;
use crate::models::session::keys;

/// Explicit handle on "who is using this browser".
///
/// Only the user id is stored; the user row is loaded fresh on every
/// [`resume`](Self::resume) so quota state is never stale.
#[derive(Debug, Clone)]
pub struct UserSession {
    session: Session,
}

impl UserSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Bind `user` to the session, rotating the session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn begin(&self, user: &User) -> Result<(), SessionError> {
        self.session.cycle_id().await?;
        self.session.insert(keys::USER_ID, user.id).await
    }

    /// Load the bound user, if any.
    ///
    /// An unreadable id, or one whose user no longer exists, is removed from
    /// the session and treated as no user. The binding is kept when the
    /// store cannot be reached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the user row cannot be loaded.
    pub async fn resume(&self, pool: &PgPool) -> Result<Option<User>, RepositoryError> {
        let user_id = match self.session.get::<UserId>(keys::USER_ID).await {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable user id in session");
                self.forget().await;
                return Ok(None);
            }
        };

        let user = UserRepository::new(pool).get_by_id(user_id).await?;
        if user.is_none() {
            tracing::info!(%user_id, "Session user no longer exists");
            self.forget().await;
        }
        Ok(user)
    }

    /// Unbind the user (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn end(&self) -> Result<(), SessionError> {
        self.session.remove::<UserId>(keys::USER_ID).await?;
        Ok(())
    }

    /// Id currently stored, without touching the database.
    pub async fn user_id(&self) -> Option<UserId> {
        self.session.get(keys::USER_ID).await.ok().flatten()
    }

    async fn forget(&self) {
        if let Err(e) = self.end().await {
            tracing::warn!(error = %e, "Failed to clear session user");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::db::unreachable_pool;
    use crate::models::user::fixtures::user;

    fn session() -> UserSession {
        UserSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_begin_and_end() {
        let s = session();
        let u = user("Ana", "11999998888");

        s.begin(&u).await.unwrap();
        assert_eq!(s.user_id().await, Some(u.id));

        s.end().await.unwrap();
        assert_eq!(s.user_id().await, None);
    }

    #[tokio::test]
    async fn test_resume_without_user() {
        let s = session();
        assert!(s.resume(&unreachable_pool()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resume_load_failure_keeps_user() {
        let s = session();
        let u = user("Ana", "11999998888");
        s.begin(&u).await.unwrap();

        assert!(matches!(
            s.resume(&unreachable_pool()).await,
            Err(RepositoryError::Database(_))
        ));
        assert_eq!(s.user_id().await, Some(u.id));
    }
}

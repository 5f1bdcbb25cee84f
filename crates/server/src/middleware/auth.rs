//! Extractor for the registered user.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::services::UserSession;
use crate::state::AppState;

/// Extractor that requires a registered user in the session.
///
/// The user row is loaded on every request, so quota fields are current.
/// Rejects with 401 when the visitor has not registered, and with 500 when
/// the user row cannot be loaded.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Olá, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let user = UserSession::new(session)
            .resume(state.pool())
            .await?
            .ok_or_else(|| AppError::Unauthorized("registration required".to_string()))?;

        set_sentry_user(user.id);
        Ok(Self(user))
    }
}

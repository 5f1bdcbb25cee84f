//! Unified error handling for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use nuvra_core::{FREE_LIMIT, UserId};

use crate::db::RepositoryError;
use crate::llm::LlmError;
use crate::services::crm::CrmError;
use crate::services::{AnalysisError, ChatError, RegistrationError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Completion API failed.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No registered user in the session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Write clashes with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Free quota spent.
    #[error("Free quota exhausted ({used} of {limit} uses)", limit = FREE_LIMIT)]
    QuotaExceeded {
        used: u32,
        /// Where the user can buy more.
        upgrade_url: String,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map an analysis failure, pointing quota errors at `upgrade_url`.
    #[must_use]
    pub fn from_analysis(err: AnalysisError, upgrade_url: &str) -> Self {
        match err {
            AnalysisError::EmptyInput => Self::BadRequest(err.to_string()),
            AnalysisError::QuotaExceeded { used } => Self::QuotaExceeded {
                used,
                upgrade_url: upgrade_url.to_owned(),
            },
            AnalysisError::Llm(e) => Self::Llm(e),
        }
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Repository(e) => Self::Database(e),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => Self::BadRequest(err.to_string()),
            ChatError::Llm(e) => Self::Llm(e),
        }
    }
}

impl From<CrmError> for AppError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::LeadNotFound | CrmError::NoQualification => Self::NotFound(err.to_string()),
            CrmError::QualificationExists => Self::Conflict(err.to_string()),
            CrmError::UnknownStage | CrmError::InvalidInput(_) => Self::BadRequest(err.to_string()),
            CrmError::NoStages => Self::Internal(err.to_string()),
            CrmError::Repository(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Session(_) | Self::Llm(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Llm(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::QuotaExceeded { .. } => StatusCode::PAYMENT_REQUIRED,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                json!({ "error": "Internal server error" })
            }
            Self::Llm(_) => json!({ "error": "External service error" }),
            Self::QuotaExceeded { used, upgrade_url } => json!({
                "error": self.to_string(),
                "used": used,
                "limit": FREE_LIMIT,
                "upgrade_url": upgrade_url,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Set the Sentry user context for the current request.
pub fn set_sentry_user(user_id: UserId) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

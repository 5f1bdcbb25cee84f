//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::llm::{LlmClient, LlmError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    llm: Option<LlmClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion client cannot be built.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, LlmError> {
        let llm = config.llm.as_ref().map(LlmClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, pool, llm }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The completion client, when an API key is configured.
    #[must_use]
    pub fn llm(&self) -> Option<&LlmClient> {
        self.inner.llm.as_ref()
    }
}

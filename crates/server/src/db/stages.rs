//! Pipeline stages and lead sources.
//!
//! Both tables are seeded by migration and read-only at runtime.

use sqlx::PgPool;

use nuvra_core::{SourceId, StageId};

use super::RepositoryError;
use crate::models::{Source, Stage};

/// Repository for pipeline stages.
pub struct StageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All stages in pipeline order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Stage>, RepositoryError> {
        let stages = sqlx::query_as::<_, Stage>(
            r"
            SELECT id, name, order_position, color
            FROM nuvra.lead_stages
            ORDER BY order_position
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(stages)
    }

    /// Get a stage by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StageId) -> Result<Option<Stage>, RepositoryError> {
        let stage = sqlx::query_as::<_, Stage>(
            "SELECT id, name, order_position, color FROM nuvra.lead_stages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(stage)
    }

    /// The entry stage of the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first(&self) -> Result<Option<Stage>, RepositoryError> {
        let stage = sqlx::query_as::<_, Stage>(
            r"
            SELECT id, name, order_position, color
            FROM nuvra.lead_stages
            ORDER BY order_position
            LIMIT 1
            ",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(stage)
    }
}

/// Repository for lead sources.
pub struct SourceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SourceRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All sources by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Source>, RepositoryError> {
        let sources =
            sqlx::query_as::<_, Source>("SELECT id, name FROM nuvra.lead_sources ORDER BY name")
                .fetch_all(self.pool)
                .await?;

        Ok(sources)
    }

    /// Get a source by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SourceId) -> Result<Option<Source>, RepositoryError> {
        let source =
            sqlx::query_as::<_, Source>("SELECT id, name FROM nuvra.lead_sources WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(source)
    }

    /// Look a source up by its exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Source>, RepositoryError> {
        let source =
            sqlx::query_as::<_, Source>("SELECT id, name FROM nuvra.lead_sources WHERE name = $1")
                .bind(name)
                .fetch_optional(self.pool)
                .await?;

        Ok(source)
    }
}

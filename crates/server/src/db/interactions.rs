//! Interaction (contact history) repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nuvra_core::{InteractionId, InteractionType, UserId};

use super::{RepositoryError, parse_column};
use crate::models::Interaction;

#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    id: InteractionId,
    user_id: UserId,
    interaction_type: String,
    subject: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = RepositoryError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            interaction_type: parse_column(&row.interaction_type, "interaction_type")?,
            subject: row.subject,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

/// Repository for interactions.
pub struct InteractionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InteractionRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The most recent interactions of a lead, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            r"
            SELECT id, user_id, interaction_type, subject, description, created_at
            FROM nuvra.interactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Interaction::try_from).collect()
    }

    /// Append an interaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        interaction_type: InteractionType,
        subject: &str,
        description: Option<&str>,
    ) -> Result<Interaction, RepositoryError> {
        let row = sqlx::query_as::<_, InteractionRow>(
            r"
            INSERT INTO nuvra.interactions (user_id, interaction_type, subject, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, interaction_type, subject, description, created_at
            ",
        )
        .bind(user_id)
        .bind(interaction_type.as_str())
        .bind(subject)
        .bind(description)
        .fetch_one(self.pool)
        .await?;

        Interaction::try_from(row)
    }
}

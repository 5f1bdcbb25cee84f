//! Usage log repository.
//!
//! Inserting a row fires the `usage_logs_increment_total_uses` trigger, which
//! is the only writer of `users.total_uses`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nuvra_core::{AnalysisType, UsageLogId, UserId};

use super::{RepositoryError, parse_column};
use crate::models::UsageLog;

/// Longest input stored in the log, in characters.
pub const MAX_LOGGED_CHARS: usize = 500;

#[derive(Debug, sqlx::FromRow)]
struct UsageLogRow {
    id: UsageLogId,
    user_id: UserId,
    input_text: String,
    analysis_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UsageLogRow> for UsageLog {
    type Error = RepositoryError;

    fn try_from(row: UsageLogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            input_text: row.input_text,
            analysis_type: parse_column(&row.analysis_type, "analysis_type")?,
            created_at: row.created_at,
        })
    }
}

/// Cut `text` to at most [`MAX_LOGGED_CHARS`] characters.
#[must_use]
pub fn truncate_for_log(text: &str) -> &str {
    text.char_indices()
        .nth(MAX_LOGGED_CHARS)
        .and_then(|(end, _)| text.get(..end))
        .unwrap_or(text)
}

/// Repository for the usage log.
pub struct UsageLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UsageLogRepository<'a> {
    /// Create a new usage log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a log row. The input is truncated to [`MAX_LOGGED_CHARS`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn append(
        &self,
        user_id: UserId,
        input_text: &str,
        analysis_type: AnalysisType,
    ) -> Result<UsageLog, RepositoryError> {
        let row = sqlx::query_as::<_, UsageLogRow>(
            r"
            INSERT INTO nuvra.usage_logs (user_id, input_text, analysis_type)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, input_text, analysis_type, created_at
            ",
        )
        .bind(user_id)
        .bind(truncate_for_log(input_text))
        .bind(analysis_type.as_str())
        .fetch_one(self.pool)
        .await?;

        UsageLog::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_for_log("Olá"), "Olá");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let text = "ã".repeat(600);
        let cut = truncate_for_log(&text);
        assert_eq!(cut.chars().count(), MAX_LOGGED_CHARS);
        assert!(text.starts_with(cut));
    }

    #[test]
    fn test_exactly_limit() {
        let text = "a".repeat(MAX_LOGGED_CHARS);
        assert_eq!(truncate_for_log(&text).len(), MAX_LOGGED_CHARS);
    }
}

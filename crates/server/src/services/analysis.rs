//! Quota-gated analysis of marketing copy and code.

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use nuvra_core::AnalysisOutcome;
use nuvra_core::heuristics;

use super::usage::log_usage;
use crate::llm::{LlmClient, LlmError};
use crate::models::User;

/// Errors that stop an analysis from being produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("text to analyze is empty")]
    EmptyInput,

    /// The user has spent the free quota.
    #[error("free quota exhausted ({used} uses)")]
    QuotaExceeded { used: u32 },

    #[error("completion failed: {0}")]
    Llm(#[from] LlmError),
}

/// An analysis and the user's state after it was counted.
#[derive(Debug)]
pub struct Analyzed {
    pub outcome: AnalysisOutcome,
    pub user: User,
}

/// Analyze `text` for `user`.
///
/// The quota is checked first. The result is produced by the model when a
/// client is configured, otherwise by the local heuristics, and then logged.
/// A failed log write is reported but does not withhold the result; the
/// returned user is then the one passed in.
///
/// # Errors
///
/// Returns `AnalysisError::EmptyInput` for blank text,
/// `AnalysisError::QuotaExceeded` when the user may not analyze, and
/// `AnalysisError::Llm` if the completion request fails.
#[instrument(skip(pool, llm, user, text), fields(user_id = %user.id, llm = llm.is_some()))]
pub async fn analyze_for(
    pool: &PgPool,
    llm: Option<&LlmClient>,
    user: &User,
    text: &str,
) -> Result<Analyzed, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    if !user.can_use() {
        return Err(AnalysisError::QuotaExceeded {
            used: user.total_uses,
        });
    }

    let outcome = match llm {
        Some(client) => client.analyze(text).await?,
        None => heuristics::analyze(text),
    };

    let user = match log_usage(pool, user, text, outcome.analysis_type()).await {
        Ok(updated) => updated,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to log analysis usage");
            user.clone()
        }
    };

    Ok(Analyzed { outcome, user })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nuvra_core::{FREE_LIMIT, SubscriptionStatus};

    use super::*;
    use crate::db::unreachable_pool;
    use crate::models::user::fixtures::user;

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let pool = unreachable_pool();
        let u = user("Ana", "11999998888");
        let err = analyze_for(&pool, None, &u, "  \n ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[tokio::test]
    async fn test_quota_exhausted() {
        let pool = unreachable_pool();
        let mut u = user("Ana", "11999998888");
        u.total_uses = FREE_LIMIT;
        let err = analyze_for(&pool, None, &u, "Compre agora").await.unwrap_err();
        assert!(matches!(err, AnalysisError::QuotaExceeded { used: 10 }));
    }

    #[tokio::test]
    async fn test_result_survives_log_failure() {
        let pool = unreachable_pool();
        let mut u = user("Ana", "11999998888");
        u.subscription_status = SubscriptionStatus::Active;
        u.total_uses = 42;

        let analyzed = analyze_for(&pool, None, &u, "oi").await.unwrap();
        assert_eq!(analyzed.outcome, heuristics::analyze("oi"));
        assert_eq!(analyzed.user.total_uses, 42);
    }
}

//! Usage accounting.

use sqlx::PgPool;
use tracing::instrument;

use nuvra_core::AnalysisType;

use crate::db::{RepositoryError, UsageLogRepository, UserRepository};
use crate::models::User;

/// Record one use and return the user as the database now sees it.
///
/// The counter is bumped by a trigger on the log insert, so the re-read is
/// the only source of the new `total_uses`.
///
/// # Errors
///
/// Returns `RepositoryError` if the insert or the re-read fails, or
/// `RepositoryError::NotFound` if the user vanished in between.
#[instrument(skip(pool, user, text), fields(user_id = %user.id))]
pub async fn log_usage(
    pool: &PgPool,
    user: &User,
    text: &str,
    analysis_type: AnalysisType,
) -> Result<User, RepositoryError> {
    UsageLogRepository::new(pool)
        .append(user.id, text, analysis_type)
        .await?;

    UserRepository::new(pool)
        .get_by_id(user.id)
        .await?
        .ok_or(RepositoryError::NotFound)
}

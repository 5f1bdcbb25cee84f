//! Subcommand implementations.

pub mod analyze;
pub mod chat;
pub mod migrate;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use nuvra_server::db::{self, RepositoryError};

/// Errors shared by the commands that touch the database.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// No user is registered with the phone.
    #[error("No user with phone {0}")]
    UserNotFound(String),

    #[error("Nothing to analyze")]
    EmptyInput,

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connect to the database named by `DATABASE_URL`.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&SecretString::from(database_url)).await?)
}

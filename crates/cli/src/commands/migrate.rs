//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! nuvra migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migrations live in `crates/server/migrations/` and create everything
//! under the `nuvra` schema, including the seeded pipeline stages and lead
//! sources.

use super::{CommandError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

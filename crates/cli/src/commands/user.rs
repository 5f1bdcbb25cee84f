//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Grant unlimited use
//! nuvra user set-status --phone 11999998888 --status active
//!
//! # Inspect a user and their remaining quota
//! nuvra user show --phone 11999998888
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use nuvra_core::{Phone, SubscriptionStatus};
use nuvra_server::db::{RepositoryError, UserRepository};
use nuvra_server::models::User;

use super::{CommandError, connect};

/// Change the subscription tier of the user with `phone`.
pub async fn set_status(phone: &Phone, status: SubscriptionStatus) -> Result<(), CommandError> {
    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .set_subscription_status(phone, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CommandError::UserNotFound(phone.to_string()),
            other => CommandError::Repository(other),
        })?;

    tracing::info!(
        user_id = %user.id,
        status = %user.subscription_status,
        "Subscription updated for {}",
        user.name
    );
    print_user(&user)
}

/// Print the user with `phone` and their remaining quota.
pub async fn show(phone: &Phone) -> Result<(), CommandError> {
    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .get_by_phone(phone)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(phone.to_string()))?;

    print_user(&user)
}

fn print_user(user: &User) -> Result<(), CommandError> {
    let output = serde_json::json!({
        "user": user,
        "remaining_uses": user.remaining(),
    });

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

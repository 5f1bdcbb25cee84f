//! Nuvra CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! nuvra migrate
//!
//! # Score copy (or review code) with the local heuristics
//! nuvra analyze "Descubra o segredo para vender mais"
//! nuvra analyze --file landing.txt
//!
//! # Print the canned chat reply
//! nuvra chat "Como melhorar meu CTA?"
//!
//! # Change a user's subscription
//! nuvra user set-status --phone 11999998888 --status active
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nuvra_core::{Phone, SubscriptionStatus};

mod commands;

#[derive(Parser)]
#[command(name = "nuvra")]
#[command(author, version, about = "Nuvra AI CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Analyze copy or code offline and print the result as JSON
    Analyze {
        /// Text to analyze
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print the canned chat reply to a message
    Chat {
        /// Message to answer
        message: String,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Change a user's subscription status
    SetStatus {
        /// Registered phone (digits, 10 or 11)
        #[arg(short, long)]
        phone: Phone,

        /// New status (`free`, `trial`, `active`, `client`)
        #[arg(short, long)]
        status: SubscriptionStatus,
    },
    /// Show a user and their remaining uses
    Show {
        #[arg(short, long)]
        phone: Phone,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Analyze { text, file } => {
            commands::analyze::run(text.as_deref(), file.as_deref())?;
        }
        Commands::Chat { message } => commands::chat::run(&message),
        Commands::User { action } => match action {
            UserAction::SetStatus { phone, status } => {
                commands::user::set_status(&phone, status).await?;
            }
            UserAction::Show { phone } => commands::user::show(&phone).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_set_status() {
        let cli = Cli::try_parse_from([
            "nuvra",
            "user",
            "set-status",
            "--phone",
            "11999998888",
            "--status",
            "active",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserAction::SetStatus {
                    status: SubscriptionStatus::Active,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["nuvra", "user", "show", "--phone", "123"]).is_err());
        assert!(
            Cli::try_parse_from([
                "nuvra",
                "user",
                "set-status",
                "--phone",
                "11999998888",
                "--status",
                "gold",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_analyze_needs_input() {
        assert!(Cli::try_parse_from(["nuvra", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["nuvra", "analyze", "--file", "a.txt"]).is_ok());
    }
}

//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `NUVRA_HOST` - Bind address (default: 127.0.0.1)
//! - `NUVRA_PORT` - Listen port (default: 3000)
//! - `NUVRA_BASE_URL` - Public URL (default: <http://localhost:3000>); `https://`
//!   turns on Secure session cookies
//! - `NUVRA_UPGRADE_URL` - Where users go once the free quota is exhausted
//! - `NUVRA_LOG_JSON` - Emit JSON logs instead of text when set
//! - `OPENAI_API_KEY` - Enables LLM-backed analysis and chat
//! - `OPENAI_MODEL` - Completion model (default: gpt-4o-mini)
//! - `OPENAI_BASE_URL` - API root (default: <https://api.openai.com/v1>)
//! - `OPENAI_TIMEOUT_SECS` - Request timeout (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default destination of the "upgrade" call to action.
pub const DEFAULT_UPGRADE_URL: &str = "https://wa.me/5511999999999?text=Ol%C3%A1!%20Gostaria%20de%20saber%20mais%20sobre%20os%20planos%20da%20Nuvra%20AI%20e%20como%20posso%20continuar%20usando%20a%20plataforma.";

/// Values copied verbatim from sample `.env` files (case-insensitive).
const PLACEHOLDER_VALUES: &[&str] = &[
    "changeme",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "sk-xxx",
    "sk-...",
    "sk-your-key",
];

/// Prefixes of placeholder instructions (case-insensitive).
const PLACEHOLDER_PREFIXES: &[&str] = &[
    "your-",
    "your_",
    "sk-your",
    "insert-",
    "enter-",
    "put-your",
    "add-your",
    "replace-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Link returned when a user runs out of free uses
    pub upgrade_url: String,
    /// JSON log output
    pub log_json: bool,
    /// Completion API; `None` keeps everything on the local heuristics
    pub llm: Option<LlmConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// OpenAI-compatible completion API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub model: String,
    /// API root; `/chat/completions` is appended
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(get_required_env("DATABASE_URL")?);
        let host = get_env_or_default("NUVRA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("NUVRA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("NUVRA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("NUVRA_PORT".to_string(), e.to_string()))?;
        let base_url = get_url("NUVRA_BASE_URL", "http://localhost:3000")?;
        let upgrade_url = get_url("NUVRA_UPGRADE_URL", DEFAULT_UPGRADE_URL)?;
        let log_json = get_optional_env("NUVRA_LOG_JSON").is_some_and(|v| is_truthy(&v));
        let llm = LlmConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            upgrade_url,
            log_json,
            llm,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl LlmConfig {
    /// Load the completion API settings. Absent key means no LLM.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = get_optional_env("OPENAI_API_KEY").filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };
        validate_secret_strength(&api_key, "OPENAI_API_KEY")?;

        let timeout_secs = get_env_or_default("OPENAI_TIMEOUT_SECS", "60")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("OPENAI_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Some(Self {
            api_key: SecretString::from(api_key),
            model: get_env_or_default("OPENAI_MODEL", "gpt-4o-mini"),
            base_url: get_url("OPENAI_BASE_URL", "https://api.openai.com/v1")?
                .trim_end_matches('/')
                .to_owned(),
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an absolute URL, falling back to `default`.
fn get_url(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = get_env_or_default(key, default);
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a third-party key is not a placeholder and has sufficient
/// entropy.
///
/// Only whole placeholder values and instruction prefixes are rejected; a
/// random key may contain any substring.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.trim().to_lowercase();

    let placeholder = PLACEHOLDER_VALUES.contains(&lower.as_str())
        || PLACEHOLDER_PREFIXES.iter().any(|p| lower.starts_with(p))
        || (lower.starts_with('<') && lower.ends_with('>'));
    if placeholder {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "appears to be a placeholder".to_string(),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

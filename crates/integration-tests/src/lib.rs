//! Integration tests for Nuvra AI.
//!
//! The tests in `tests/` drive a running `nuvra-server` over HTTP and are
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p nuvra-cli -- migrate
//! cargo run -p nuvra-server &
//! cargo test -p nuvra-integration-tests -- --ignored
//! ```
//!
//! Unset `OPENAI_API_KEY` on the server so analyses are deterministic.
//! `NUVRA_BASE_URL` overrides the default `http://localhost:3000`.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("NUVRA_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A phone number no earlier run has used (11 digits).
#[must_use]
pub fn unique_phone() -> String {
    let n = uuid::Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("11{n:09}")
}

/// Register a fresh user on `client` and return the response body.
///
/// # Panics
///
/// Panics if the request fails or the server rejects the registration.
#[allow(clippy::expect_used)]
pub async fn register(client: &Client, name: &str) -> Value {
    let resp = client
        .post(format!("{}/api/register", base_url()))
        .json(&json!({ "name": name, "phone": unique_phone() }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse registration")
}

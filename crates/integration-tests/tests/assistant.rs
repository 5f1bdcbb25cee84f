//! Registration, quota and chat against a running server.
//!
//! Requires `PostgreSQL` with migrations applied and `nuvra-server` running
//! without `OPENAI_API_KEY`.

use reqwest::StatusCode;
use serde_json::{Value, json};

use nuvra_core::FREE_LIMIT;
use nuvra_core::heuristics::chat::{GREETING, QUOTA_EXHAUSTED_REPLY};
use nuvra_integration_tests::{base_url, register, session_client, unique_phone};

const COPY: &str = "Descubra agora o segredo que milhares de clientes já usam para vender mais";

#[tokio::test]
#[ignore = "Requires running nuvra-server and PostgreSQL"]
async fn test_health() {
    let resp = session_client()
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach server");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running nuvra-server and PostgreSQL"]
async fn test_register_binds_session() {
    let client = session_client();
    let body = register(&client, "Ana Teste").await;
    assert_eq!(body["user"]["subscription_status"], "free");
    assert_eq!(body["remaining_uses"], json!({"kind": "limited", "count": FREE_LIMIT}));

    let me: Value = client
        .get(format!("{}/api/me", base_url()))
        .send()
        .await
        .expect("Failed to get /api/me")
        .json()
        .await
        .expect("Failed to parse /api/me");
    assert_eq!(me["user"]["id"], body["user"]["id"]);

    let resp = client
        .post(format!("{}/api/logout", base_url()))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/me", base_url()))
        .send()
        .await
        .expect("Failed to get /api/me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running nuvra-server and PostgreSQL"]
async fn test_register_same_phone_returns_same_user() {
    let phone = unique_phone();
    let mut ids = Vec::new();
    for name in ["Primeiro", "Segundo"] {
        let body: Value = session_client()
            .post(format!("{}/api/register", base_url()))
            .json(&json!({ "name": name, "phone": phone }))
            .send()
            .await
            .expect("Failed to register")
            .json()
            .await
            .expect("Failed to parse registration");
        ids.push(body["user"]["id"].clone());
        assert_eq!(body["user"]["name"], "Primeiro");
    }
    assert_eq!(ids[0], ids[1]);
}

#[tokio::test]
#[ignore = "Requires running nuvra-server and PostgreSQL"]
async fn test_free_quota_is_enforced() {
    let client = session_client();
    register(&client, "Quota Teste").await;

    for used in 1..=FREE_LIMIT {
        let body: Value = client
            .post(format!("{}/api/analyze", base_url()))
            .json(&json!({ "text": COPY }))
            .send()
            .await
            .expect("Failed to analyze")
            .json()
            .await
            .expect("Failed to parse analysis");
        assert_eq!(body["result"]["kind"], "structured_score");
        assert_eq!(body["remaining_uses"]["count"], FREE_LIMIT - used);
    }

    let resp = client
        .post(format!("{}/api/analyze", base_url()))
        .json(&json!({ "text": COPY }))
        .send()
        .await
        .expect("Failed to analyze");
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["used"], FREE_LIMIT);
    assert!(body["upgrade_url"].is_string());

    // Chat answers with the limit notice instead of an error
    let body: Value = client
        .post(format!("{}/api/chat", base_url()))
        .json(&json!({ "message": "Olá" }))
        .send()
        .await
        .expect("Failed to chat")
        .json()
        .await
        .expect("Failed to parse chat");
    assert_eq!(body["reply"], QUOTA_EXHAUSTED_REPLY);
    assert_eq!(body["remaining_uses"]["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running nuvra-server and PostgreSQL"]
async fn test_code_review_and_chat() {
    let client = session_client();
    register(&client, "Dev Teste").await;

    let body: Value = client
        .post(format!("{}/api/analyze", base_url()))
        .json(&json!({ "text": "function soma(a, b) {\n  return a + b;\n}" }))
        .send()
        .await
        .expect("Failed to analyze")
        .json()
        .await
        .expect("Failed to parse analysis");
    assert_eq!(body["result"]["kind"], "raw_text");

    let greeting: Value = client
        .get(format!("{}/api/chat", base_url()))
        .send()
        .await
        .expect("Failed to get greeting")
        .json()
        .await
        .expect("Failed to parse greeting");
    assert_eq!(greeting["reply"], GREETING);

    let body: Value = client
        .post(format!("{}/api/chat", base_url()))
        .json(&json!({ "message": "Como melhorar meu CTA?" }))
        .send()
        .await
        .expect("Failed to chat")
        .json()
        .await
        .expect("Failed to parse chat");
    assert!(body["reply"].as_str().is_some_and(|r| !r.is_empty()));
    assert_eq!(body["remaining_uses"]["count"], FREE_LIMIT - 2);
}

#[tokio::test]
#[ignore = "Requires running nuvra-server and PostgreSQL"]
async fn test_blank_analysis_is_rejected() {
    let client = session_client();
    register(&client, "Vazio Teste").await;

    let resp = client
        .post(format!("{}/api/analyze", base_url()))
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .expect("Failed to analyze");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness
//! GET  /health/ready                   - Database ping
//!
//! # Assistant (session-bound user)
//! POST /api/register                   - Resolve-or-create by phone, bind to session
//! GET  /api/me                         - Current user and remaining uses
//! POST /api/logout                     - Unbind the user
//! POST /api/analyze                    - Score copy or review code (402 when out of quota)
//! GET  /api/chat                       - Greeting
//! POST /api/chat                       - Reply to a message
//!
//! # CRM
//! GET  /crm/stats                      - Dashboard numbers
//! GET  /crm/leads?search=&stage=       - Filtered lead list
//! GET  /crm/leads/{id}                 - Lead detail
//! POST /crm/leads/{id}/qualify         - Mark as qualified
//! POST /crm/leads/{id}/qualification   - Open a qualification
//! PUT  /crm/leads/{id}/qualification   - Edit the qualification
//! POST /crm/leads/{id}/interactions    - Record a contact
//! GET  /crm/stages                     - Pipeline stages
//! GET  /crm/pipeline                   - Leads per stage
//! GET  /crm/analytics                  - Aggregates
//! ```

pub mod api;
pub mod crm;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new().merge(api::router()).merge(crm::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::routes;
    use crate::state::fixtures::offline_state;

    /// The API over an in-memory session store and an unreachable database.
    pub fn app() -> Router {
        routes()
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(offline_state())
    }

    /// Send one request and return status and JSON body (`Null` if empty).
    #[allow(clippy::unwrap_used)]
    pub async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[allow(clippy::unwrap_used)]
    pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

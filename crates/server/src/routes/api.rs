//! Assistant endpoints: registration, analysis and chat.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use nuvra_core::heuristics::chat::GREETING;
use nuvra_core::{AnalysisOutcome, Remaining};

use crate::error::AppError;
use crate::llm::ChatMessage;
use crate::middleware::RequireUser;
use crate::models::User;
use crate::services::{self, Registration, UserSession};
use crate::state::AppState;

/// Build the assistant router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/me", get(me))
        .route("/api/logout", post(logout))
        .route("/api/analyze", post(analyze))
        .route("/api/chat", get(greeting).post(chat))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A user with their remaining quota.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
    pub remaining_uses: Remaining,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            remaining_uses: user.remaining(),
            user,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub result: AnalysisOutcome,
    pub remaining_uses: Remaining,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Earlier turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Absent on the greeting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_uses: Option<Remaining>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register (or recognize) a user and bind them to the session.
async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let registration = Registration::parse(&form.name, &form.phone, form.email.as_deref())?;
    let user = services::register(state.pool(), registration).await?;

    UserSession::new(session).begin(&user).await?;

    Ok(Json(user.into()))
}

async fn me(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(user.into())
}

async fn logout(session: Session) -> Result<StatusCode, AppError> {
    UserSession::new(session).end().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Analyze copy or code, counting one use.
async fn analyze(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analyzed = services::analyze_for(state.pool(), state.llm(), &user, &request.text)
        .await
        .map_err(|e| AppError::from_analysis(e, &state.config().upgrade_url))?;

    Ok(Json(AnalyzeResponse {
        result: analyzed.outcome,
        remaining_uses: analyzed.user.remaining(),
    }))
}

async fn greeting() -> Json<ChatResponse> {
    Json(ChatResponse {
        reply: GREETING.to_string(),
        remaining_uses: None,
    })
}

/// Reply to a chat message, counting one use.
async fn chat(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let turn = services::reply_to(
        state.pool(),
        state.llm(),
        &user,
        &request.history,
        &request.message,
    )
    .await?;

    Ok(Json(ChatResponse {
        reply: turn.reply,
        remaining_uses: Some(turn.user.remaining()),
    }))
}

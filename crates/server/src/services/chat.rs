//! Quota-gated chat.

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use nuvra_core::AnalysisType;
use nuvra_core::heuristics::chat::{QUOTA_EXHAUSTED_REPLY, respond};

use super::usage::log_usage;
use crate::llm::{ChatMessage, LlmClient, LlmError};
use crate::models::User;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("completion failed: {0}")]
    Llm(#[from] LlmError),
}

/// A reply and the user's state after the turn.
#[derive(Debug)]
pub struct ChatTurn {
    pub reply: String,
    pub user: User,
}

/// Answer `message` in the context of `history`.
///
/// A user without quota gets the fixed limit reply; nothing is logged for
/// that turn. Otherwise the model (or the canned responder) answers and the
/// message is logged as a chat use.
///
/// # Errors
///
/// Returns `ChatError::EmptyMessage` for a blank message and
/// `ChatError::Llm` if the completion request fails.
#[instrument(skip(pool, llm, user, history, message), fields(user_id = %user.id, turns = history.len()))]
pub async fn reply_to(
    pool: &PgPool,
    llm: Option<&LlmClient>,
    user: &User,
    history: &[ChatMessage],
    message: &str,
) -> Result<ChatTurn, ChatError> {
    if message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    if !user.can_use() {
        return Ok(ChatTurn {
            reply: QUOTA_EXHAUSTED_REPLY.to_owned(),
            user: user.clone(),
        });
    }

    let reply = match llm {
        Some(client) => client.chat(history, message).await?,
        None => respond(message),
    };

    let user = match log_usage(pool, user, message, AnalysisType::Chat).await {
        Ok(updated) => updated,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to log chat usage");
            user.clone()
        }
    };

    Ok(ChatTurn { reply, user })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nuvra_core::FREE_LIMIT;

    use super::*;
    use crate::db::unreachable_pool;
    use crate::models::user::fixtures::user;

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let pool = unreachable_pool();
        let u = user("Ana", "11999998888");
        let err = reply_to(&pool, None, &u, &[], "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[tokio::test]
    async fn test_over_quota_gets_limit_reply() {
        let pool = unreachable_pool();
        let mut u = user("Ana", "11999998888");
        u.total_uses = FREE_LIMIT + 3;

        let turn = reply_to(&pool, None, &u, &[], "Como vender mais?").await.unwrap();
        assert_eq!(turn.reply, QUOTA_EXHAUSTED_REPLY);
        assert_eq!(turn.user.total_uses, FREE_LIMIT + 3);
    }

    #[tokio::test]
    async fn test_canned_reply_without_llm() {
        let pool = unreachable_pool();
        let u = user("Ana", "11999998888");

        let turn = reply_to(&pool, None, &u, &[], "Como melhorar minha conversão?")
            .await
            .unwrap();
        assert_eq!(turn.reply, respond("Como melhorar minha conversão?"));
    }
}

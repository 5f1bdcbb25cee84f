//! OpenAI-compatible completion API.
//!
//! When `OPENAI_API_KEY` is configured, analysis and chat are answered by
//! the model instead of the local heuristics. Every request carries the
//! fixed Nuvra system prompt ([`prompt::SYSTEM_PROMPT`]).
//!
//! There is no retry and no streaming: one `POST {base}/chat/completions`
//! per user action, bounded by the configured timeout.

mod client;
mod error;
pub mod parse;
pub mod prompt;
mod types;

pub use client::LlmClient;
pub use error::{ApiErrorResponse, LlmError};
pub use parse::parse_analysis;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, Role};

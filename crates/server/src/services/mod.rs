//! Business logic services.
//!
//! # Services
//!
//! - `session` - Binding a registered user to the HTTP session
//! - `registration` - Resolve-or-create a user by phone
//! - `usage` - Usage log append and authoritative re-read
//! - `analysis` - Quota-gated copy/code analysis (LLM or heuristics)
//! - `chat` - Quota-gated chat replies
//! - `crm` - Lead list, detail, pipeline and analytics

pub mod analysis;
pub mod chat;
pub mod crm;
pub mod registration;
pub mod session;
pub mod usage;

pub use analysis::{AnalysisError, Analyzed, analyze_for};
pub use chat::{ChatError, ChatTurn, reply_to};
pub use registration::{Registration, RegistrationError, register};
pub use session::UserSession;
pub use usage::log_usage;

//! Nuvra Core - Shared types and the heuristic analysis engine.
//!
//! This crate is used by every Nuvra AI component:
//! - `server` - JSON API for the assistant and the CRM
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. The analyzer and chat responder can run anywhere,
//! including offline from the CLI.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, phone/email, and stored status enums
//! - [`quota`] - The free-usage limit
//! - [`heuristics`] - Code/copy classification, scoring, rewriting, chat

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod heuristics;
pub mod quota;
pub mod types;

pub use heuristics::{AnalysisOutcome, AnalysisReport, Suggestion};
pub use quota::{FREE_LIMIT, Remaining, check_usage_limit, remaining_uses};
pub use types::*;

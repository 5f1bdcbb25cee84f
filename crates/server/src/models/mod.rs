//! Domain models for the server.

pub mod lead;
pub mod session;
pub mod user;

pub use lead::{Interaction, Qualification, Source, Stage, UsageLog};
pub use user::User;

//! Core types for Nuvra AI.
//!
//! Type-safe wrappers for ids, contact details and stored enums.

pub mod contact;
pub mod id;
pub mod status;

pub use contact::{Email, EmailError, Phone, PhoneError};
pub use id::*;
pub use status::*;

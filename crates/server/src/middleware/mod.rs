//! HTTP middleware.
//!
//! - `session` - `PostgreSQL`-backed sessions (tower-sessions)
//! - `auth` - Extractor for the registered user bound to the session
//! - `request_id` - Correlation id per request

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::RequireUser;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};

//! Keys of values stored in the HTTP session.

/// Session keys.
pub mod keys {
    /// Id of the registered user bound to this browser.
    pub const USER_ID: &str = "nuvra_user_id";
}

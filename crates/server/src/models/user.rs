//! Registered user (and CRM lead).

use chrono::{DateTime, Utc};
use serde::Serialize;

use nuvra_core::{
    Email, Phone, Remaining, SubscriptionStatus, UserId, check_usage_limit, remaining_uses,
};

/// A registered user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone: Phone,
    pub email: Option<Email>,
    pub subscription_status: SubscriptionStatus,
    /// Maintained by the database on every usage log insert.
    pub total_uses: u32,
    pub is_qualified: bool,
    pub lead_source: Option<String>,
    pub last_contact_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether another analysis or chat turn is allowed.
    #[must_use]
    pub const fn can_use(&self) -> bool {
        check_usage_limit(self.subscription_status, self.total_uses)
    }

    #[must_use]
    pub const fn remaining(&self) -> Remaining {
        remaining_uses(self.subscription_status, self.total_uses)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A free user created at the Unix epoch.
    #[allow(clippy::unwrap_used)]
    pub fn user(name: &str, phone: &str) -> User {
        User {
            id: UserId::generate(),
            name: name.to_string(),
            phone: Phone::parse(phone).unwrap(),
            email: None,
            subscription_status: SubscriptionStatus::Free,
            total_uses: 0,
            is_qualified: false,
            lead_source: Some("Nuvra AI App".to_string()),
            last_contact_at: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

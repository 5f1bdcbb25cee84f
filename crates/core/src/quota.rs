//! Free-usage quota.
//!
//! Users on the `free` and `trial` tiers may run [`FREE_LIMIT`] requests;
//! `active` and `client` subscribers are never limited.

use serde::{Deserialize, Serialize};

use crate::SubscriptionStatus;

/// Number of requests available to a non-paying user.
pub const FREE_LIMIT: u32 = 10;

/// Whether a user may issue another request.
#[must_use]
pub const fn check_usage_limit(status: SubscriptionStatus, total_uses: u32) -> bool {
    status.is_unlimited() || total_uses < FREE_LIMIT
}

/// Requests left before the quota is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Remaining {
    Unlimited,
    Limited(u32),
}

/// Compute the remaining uses for a user. Never underflows.
#[must_use]
pub const fn remaining_uses(status: SubscriptionStatus, total_uses: u32) -> Remaining {
    if status.is_unlimited() {
        Remaining::Unlimited
    } else {
        Remaining::Limited(FREE_LIMIT.saturating_sub(total_uses))
    }
}

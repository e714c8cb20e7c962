//! Application Configuration
//!
//! Configuration for the referral application layer.

use std::time::Duration;

use chrono::TimeDelta;

pub use crate::domain::value_objects::ResolutionPolicy;
pub use platform::rate_limit::RateLimitConfig;

/// Referral application configuration
#[derive(Debug, Clone)]
pub struct ReferralConfig {
    /// Lifetime of a newly issued link (1 day)
    pub link_ttl: Duration,
    /// Upper bound on a single vendor call
    pub vendor_timeout: Duration,
    /// Behaviour when the same link is resolved more than once
    pub resolution_policy: ResolutionPolicy,
    /// Budget for the issue and resolve endpoints, per route and client
    pub rate_limit: RateLimitConfig,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            link_ttl: Duration::from_secs(24 * 3600),
            vendor_timeout: Duration::from_secs(5),
            resolution_policy: ResolutionPolicy::AppendAttempt,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ReferralConfig {
    /// Create config for development (relaxed rate limit)
    pub fn development() -> Self {
        Self {
            rate_limit: RateLimitConfig::new(100, 60),
            ..Default::default()
        }
    }

    pub fn link_ttl_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.link_ttl).unwrap_or(TimeDelta::MAX)
    }
}

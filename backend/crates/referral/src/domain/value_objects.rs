//! Domain Value Objects
//!
//! Immutable value types for the referral domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel a referral link is shared through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShareChannel {
    Sms,
    Email,
    ShareSheet,
    CopyLink,
}

impl ShareChannel {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use ShareChannel::*;
        match self {
            Sms => "SMS",
            Email => "EMAIL",
            ShareSheet => "SHARE_SHEET",
            CopyLink => "COPY_LINK",
        }
    }
}

impl fmt::Display for ShareChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Screen the app opens on after resolving a deep link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationType {
    #[default]
    AuthGateDefault,
    AuthGateReferral,
}

/// Lifecycle of a referred user as seen by the referrer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralStatus {
    #[default]
    Pending,
    Complete,
    Expired,
    Invalid,
}

/// Channel-specific text the referrer sends along with the link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub channel: ShareChannel,
    pub subject: Option<String>,
    pub message: String,
}

/// Result of a deferred link vendor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorLink {
    pub url: String,
    pub vendor_token: String,
}

/// Landing screen plus its marketing copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub destination_type: DestinationType,
    pub title: String,
    pub body: String,
    pub primary_cta: String,
    pub secondary_cta: String,
}

/// What the resolver does when a link is resolved again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Every resolution appends a fresh PENDING summary
    #[default]
    AppendAttempt,
    /// Reuse the latest summary for the link, bumping its `updated_at`
    RefreshExisting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_channel_wire_format() {
        assert_eq!(
            serde_json::to_string(&ShareChannel::ShareSheet).unwrap(),
            r#""SHARE_SHEET""#
        );
        let channel: ShareChannel = serde_json::from_str(r#""COPY_LINK""#).unwrap();
        assert_eq!(channel, ShareChannel::CopyLink);
        assert!(serde_json::from_str::<ShareChannel>(r#""FAX""#).is_err());
    }

    #[test]
    fn test_share_channel_display_matches_wire() {
        for channel in [
            ShareChannel::Sms,
            ShareChannel::Email,
            ShareChannel::ShareSheet,
            ShareChannel::CopyLink,
        ] {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{channel}\""));
        }
    }

    #[test]
    fn test_enum_defaults() {
        assert_eq!(DestinationType::default(), DestinationType::AuthGateDefault);
        assert_eq!(ReferralStatus::default(), ReferralStatus::Pending);
        assert_eq!(ResolutionPolicy::default(), ResolutionPolicy::AppendAttempt);
        assert_eq!(
            serde_json::to_string(&DestinationType::AuthGateReferral).unwrap(),
            r#""AUTH_GATE_REFERRAL""#
        );
    }
}

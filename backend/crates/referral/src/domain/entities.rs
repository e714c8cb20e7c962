//! Domain Entities
//!
//! Core business entities for the referral domain.

use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::{ReferralLinkId, ReferralSummaryId};
use platform::keyed_store::Keyed;
use uuid::Uuid;

use crate::domain::value_objects::{DestinationType, ReferralStatus, ShareChannel, VendorLink};

/// A shareable deferred deep link minted for a referrer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralLink {
    pub id: ReferralLinkId,
    pub referrer_user_id: String,
    pub referrer_referral_code: String,
    pub channel: ShareChannel,
    /// Vendor-issued token; unique across links
    pub vendor_token: String,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// `None` resolves as [`DestinationType::AuthGateDefault`]
    pub destination_type: Option<DestinationType>,
}

impl ReferralLink {
    /// Create a freshly issued link
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn issue(
        referrer_user_id: String,
        referrer_referral_code: String,
        channel: ShareChannel,
        vendor_link: VendorLink,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            id: ReferralLinkId::new(),
            referrer_user_id,
            referrer_referral_code,
            channel,
            vendor_token: vendor_link.vendor_token,
            share_url: vendor_link.url,
            created_at: now,
            expires_at: now
                .checked_add_signed(ttl.max(TimeDelta::zero()))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            destination_type: Some(DestinationType::AuthGateReferral),
        }
    }

    /// Expired only once `now` is strictly past `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn resolved_destination(&self) -> DestinationType {
        self.destination_type.unwrap_or_default()
    }
}

impl Keyed for ReferralLink {
    fn key(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn partition(&self) -> &str {
        &self.referrer_user_id
    }

    fn ordering_ticks(&self) -> i64 {
        self.created_at.timestamp_micros()
    }
}

/// One referred visit as seen by the referrer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralSummary {
    pub id: ReferralSummaryId,
    pub referrer_user_id: String,
    /// May be empty until the referred user signs up
    pub display_name: String,
    pub status: ReferralStatus,
    pub updated_at: DateTime<Utc>,
    pub referral_link_id: Option<ReferralLinkId>,
}

impl ReferralSummary {
    /// New PENDING summary recording a resolution of `link`
    pub fn pending_for(link: &ReferralLink, now: DateTime<Utc>) -> Self {
        Self {
            id: ReferralSummaryId::new(),
            referrer_user_id: link.referrer_user_id.clone(),
            display_name: String::new(),
            status: ReferralStatus::Pending,
            updated_at: now,
            referral_link_id: Some(link.id),
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Keyed for ReferralSummary {
    fn key(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn partition(&self) -> &str {
        &self.referrer_user_id
    }

    fn ordering_ticks(&self) -> i64 {
        self.updated_at.timestamp_micros()
    }
}

//! Repository Traits
//!
//! Interfaces for data persistence and the deferred link vendor.
//! Implementations are in the infrastructure layer.

use kernel::id::ReferralLinkId;
use platform::pagination::{Cursor, Page};
use thiserror::Error;

use crate::domain::entities::{ReferralLink, ReferralSummary};
use crate::domain::value_objects::VendorLink;
use crate::error::ReferralResult;

/// Referral link repository trait
#[trait_variant::make(ReferralLinkRepository: Send)]
pub trait LocalReferralLinkRepository {
    /// Persist a new link; fails with `Conflict` if its vendor token is taken
    async fn create_link(&self, link: &ReferralLink) -> ReferralResult<()>;

    /// Find link by ID
    async fn find_link_by_id(&self, id: &ReferralLinkId) -> ReferralResult<Option<ReferralLink>>;

    /// Find link by vendor token
    async fn find_link_by_vendor_token(
        &self,
        vendor_token: &str,
    ) -> ReferralResult<Option<ReferralLink>>;

    /// One page of a referrer's links, newest first
    async fn list_links_by_referrer(
        &self,
        referrer_user_id: &str,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> ReferralResult<Page<ReferralLink>>;
}

/// Referral summary repository trait
#[trait_variant::make(ReferralSummaryRepository: Send)]
pub trait LocalReferralSummaryRepository {
    /// Insert or replace by summary ID
    async fn upsert_summary(&self, summary: &ReferralSummary) -> ReferralResult<()>;

    /// Most recently updated summary pointing at `link_id`
    async fn find_latest_summary_for_link(
        &self,
        link_id: &ReferralLinkId,
    ) -> ReferralResult<Option<ReferralSummary>>;

    /// One page of a referrer's summaries, most recently updated first
    async fn list_summaries_by_referrer(
        &self,
        referrer_user_id: &str,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> ReferralResult<Page<ReferralSummary>>;
}

/// Failure of the deferred link vendor
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("vendor request failed: {0}")]
    Request(String),

    #[error("vendor returned an unusable link: {0}")]
    InvalidResponse(String),

    #[error("vendor did not respond in time")]
    Timeout,
}

impl VendorError {
    /// Category safe to show to clients
    pub fn category(&self) -> &'static str {
        match self {
            VendorError::Request(_) => "RequestFailed",
            VendorError::InvalidResponse(_) => "InvalidResponse",
            VendorError::Timeout => "Timeout",
        }
    }
}

/// Deferred deep link provider
#[trait_variant::make(DeferredLinkVendor: Send)]
pub trait LocalDeferredLinkVendor {
    /// Mint a link carrying `referral_code`
    async fn generate_deferred_link(&self, referral_code: &str) -> Result<VendorLink, VendorError>;
}

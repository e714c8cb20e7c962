//! Create Referral Link Use Case
//!
//! Asks the vendor for a deferred deep link, stores it, and builds the
//! channel-specific share payload.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::ReferralLinkId;
use platform::clock::Clock;

use crate::application::config::ReferralConfig;
use crate::domain::entities::ReferralLink;
use crate::domain::repository::{DeferredLinkVendor, ReferralLinkRepository, VendorError};
use crate::domain::services::build_share_payload;
use crate::domain::value_objects::{SharePayload, ShareChannel, VendorLink};
use crate::error::ReferralResult;

/// Create link input
///
/// Ids are expected to be non-blank; the HTTP layer rejects blank ones.
pub struct CreateReferralLinkInput {
    pub referrer_user_id: String,
    pub referrer_referral_code: String,
    pub channel: ShareChannel,
}

/// Create link output
#[derive(Debug, Clone)]
pub struct CreateReferralLinkOutput {
    pub referral_link_id: ReferralLinkId,
    pub share_url: String,
    pub vendor_token: String,
    pub expires_at: DateTime<Utc>,
    pub share_payload: SharePayload,
}

/// Create referral link use case
pub struct CreateReferralLinkUseCase<R, V>
where
    R: ReferralLinkRepository,
    V: DeferredLinkVendor,
{
    link_repo: Arc<R>,
    vendor: Arc<V>,
    clock: Arc<dyn Clock>,
    config: Arc<ReferralConfig>,
}

impl<R, V> CreateReferralLinkUseCase<R, V>
where
    R: ReferralLinkRepository,
    V: DeferredLinkVendor,
{
    pub fn new(
        link_repo: Arc<R>,
        vendor: Arc<V>,
        clock: Arc<dyn Clock>,
        config: Arc<ReferralConfig>,
    ) -> Self {
        Self {
            link_repo,
            vendor,
            clock,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: CreateReferralLinkInput,
    ) -> ReferralResult<CreateReferralLinkOutput> {
        let vendor_link = self.generate_link(&input.referrer_referral_code).await?;

        let link = ReferralLink::issue(
            input.referrer_user_id,
            input.referrer_referral_code,
            input.channel,
            vendor_link,
            self.clock.now(),
            self.config.link_ttl_delta(),
        );

        self.link_repo.create_link(&link).await?;

        tracing::info!(
            referral_link_id = %link.id,
            referrer_user_id = %link.referrer_user_id,
            channel = %link.channel,
            "Issued referral link"
        );

        let share_payload = build_share_payload(link.channel, &link.share_url);

        Ok(CreateReferralLinkOutput {
            referral_link_id: link.id,
            share_url: link.share_url,
            vendor_token: link.vendor_token,
            expires_at: link.expires_at,
            share_payload,
        })
    }

    /// Single vendor call, bounded by `vendor_timeout`
    async fn generate_link(&self, referral_code: &str) -> Result<VendorLink, VendorError> {
        let call = self.vendor.generate_deferred_link(referral_code);
        match tokio::time::timeout(self.config.vendor_timeout, call).await {
            Ok(Ok(link)) => Ok(link),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Deferred link vendor call failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.config.vendor_timeout.as_millis() as u64,
                    "Deferred link vendor call timed out"
                );
                Err(VendorError::Timeout)
            }
        }
    }
}

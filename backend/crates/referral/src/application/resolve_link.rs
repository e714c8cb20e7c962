//! Resolve Referral Link Use Case
//!
//! Turns a vendor token presented on first launch into referral context.
//!
//! ## Flow
//! 1. Blank token → `Validation`
//! 2. Unknown token → `Validation` naming the token (matched verbatim)
//! 3. `now > expires_at` → `Validation` ("expired")
//! 4. Record a PENDING summary for the referrer (per [`ResolutionPolicy`])
//! 5. Return the referral code and landing destination
//!
//! Nothing is written unless steps 1-3 pass.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{ReferralLinkId, ReferralSummaryId};
use platform::clock::Clock;
use serde_json::json;

use crate::application::config::{ReferralConfig, ResolutionPolicy};
use crate::domain::entities::{ReferralLink, ReferralSummary};
use crate::domain::repository::{ReferralLinkRepository, ReferralSummaryRepository};
use crate::domain::services::referral_destination;
use crate::domain::value_objects::Destination;
use crate::error::{ReferralError, ReferralResult};

/// Resolve output
#[derive(Debug, Clone)]
pub struct ResolveReferralLinkOutput {
    pub is_referred: bool,
    pub referral_code: String,
    pub destination: Destination,
    /// Code to prefill on the registration form
    pub registration_referral_code: String,
    pub referral_link_id: ReferralLinkId,
    /// Summary written (or refreshed) by this resolution
    pub referral_summary_id: ReferralSummaryId,
}

/// Resolve referral link use case
pub struct ResolveReferralLinkUseCase<L, S>
where
    L: ReferralLinkRepository,
    S: ReferralSummaryRepository,
{
    link_repo: Arc<L>,
    summary_repo: Arc<S>,
    clock: Arc<dyn Clock>,
    config: Arc<ReferralConfig>,
}

impl<L, S> ResolveReferralLinkUseCase<L, S>
where
    L: ReferralLinkRepository,
    S: ReferralSummaryRepository,
{
    pub fn new(
        link_repo: Arc<L>,
        summary_repo: Arc<S>,
        clock: Arc<dyn Clock>,
        config: Arc<ReferralConfig>,
    ) -> Self {
        Self {
            link_repo,
            summary_repo,
            clock,
            config,
        }
    }

    pub async fn execute(&self, vendor_token: &str) -> ReferralResult<ResolveReferralLinkOutput> {
        if vendor_token.trim().is_empty() {
            return Err(ReferralError::missing_parameter(
                "Vendor token cannot be null or empty.",
                "vendorToken",
            ));
        }

        let link = self
            .link_repo
            .find_link_by_vendor_token(vendor_token)
            .await?
            .ok_or_else(|| {
                ReferralError::validation_with(
                    format!("No referral found for vendor token: {vendor_token}"),
                    json!({ "vendorToken": vendor_token }),
                )
            })?;

        let now = self.clock.now();
        if link.is_expired_at(now) {
            tracing::debug!(referral_link_id = %link.id, "Rejected expired referral link");
            return Err(ReferralError::validation_with(
                format!(
                    "The referral link associated with the vendor token: {vendor_token} has expired."
                ),
                json!({ "vendorToken": vendor_token, "expiresAt": link.expires_at }),
            ));
        }

        let summary = self.record_resolution(&link, now).await?;

        tracing::info!(
            referral_link_id = %link.id,
            referral_summary_id = %summary.id,
            referrer_user_id = %link.referrer_user_id,
            "Resolved referral link"
        );

        Ok(ResolveReferralLinkOutput {
            is_referred: true,
            referral_code: link.referrer_referral_code.clone(),
            destination: referral_destination(link.resolved_destination()),
            registration_referral_code: link.referrer_referral_code,
            referral_link_id: link.id,
            referral_summary_id: summary.id,
        })
    }

    async fn record_resolution(
        &self,
        link: &ReferralLink,
        now: DateTime<Utc>,
    ) -> ReferralResult<ReferralSummary> {
        let summary = match self.config.resolution_policy {
            ResolutionPolicy::AppendAttempt => ReferralSummary::pending_for(link, now),
            ResolutionPolicy::RefreshExisting => {
                match self.summary_repo.find_latest_summary_for_link(&link.id).await? {
                    Some(mut existing) => {
                        existing.touch(now);
                        existing
                    }
                    None => ReferralSummary::pending_for(link, now),
                }
            }
        };

        self.summary_repo.upsert_summary(&summary).await?;
        Ok(summary)
    }
}

//! Get Referral Link Use Case

use std::sync::Arc;

use kernel::id::ReferralLinkId;
use serde_json::json;

use crate::domain::entities::ReferralLink;
use crate::domain::repository::ReferralLinkRepository;
use crate::error::{ReferralError, ReferralResult};

/// Get referral link use case
pub struct GetReferralLinkUseCase<R>
where
    R: ReferralLinkRepository,
{
    link_repo: Arc<R>,
}

impl<R> GetReferralLinkUseCase<R>
where
    R: ReferralLinkRepository,
{
    pub fn new(link_repo: Arc<R>) -> Self {
        Self { link_repo }
    }

    pub async fn execute(&self, referral_link_id: ReferralLinkId) -> ReferralResult<ReferralLink> {
        self.link_repo
            .find_link_by_id(&referral_link_id)
            .await?
            .ok_or_else(|| {
                ReferralError::not_found(
                    format!("Referral link with id '{referral_link_id}' was not found."),
                    json!({ "referralId": referral_link_id }),
                )
            })
    }
}

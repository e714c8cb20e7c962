//! List Referral Summaries Use Case

use std::sync::Arc;

use platform::pagination::{Cursor, Page};

use crate::application::list_links::ListInput;
use crate::domain::entities::ReferralSummary;
use crate::domain::repository::ReferralSummaryRepository;
use crate::error::ReferralResult;

/// List referral summaries use case ("My Referrals")
pub struct ListReferralSummariesUseCase<S>
where
    S: ReferralSummaryRepository,
{
    summary_repo: Arc<S>,
}

impl<S> ListReferralSummariesUseCase<S>
where
    S: ReferralSummaryRepository,
{
    pub fn new(summary_repo: Arc<S>) -> Self {
        Self { summary_repo }
    }

    pub async fn execute(&self, input: ListInput) -> ReferralResult<Page<ReferralSummary>> {
        let cursor = Cursor::decode(input.cursor.as_deref())?;

        self.summary_repo
            .list_summaries_by_referrer(&input.user_id, input.limit, cursor)
            .await
    }
}

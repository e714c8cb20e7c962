//! List Referral Links Use Case
//!
//! Cursor-paginated listing of a referrer's links, newest first.

use std::sync::Arc;

use platform::pagination::{Cursor, Page};

use crate::domain::entities::ReferralLink;
use crate::domain::repository::ReferralLinkRepository;
use crate::error::ReferralResult;

/// Page request shared by the list use cases
#[derive(Debug, Clone)]
pub struct ListInput {
    pub user_id: String,
    /// Normalized by the store: `<= 0` means 20, anything above 100 means 100
    pub limit: i64,
    /// Opaque cursor from a previous page; blank means first page
    pub cursor: Option<String>,
}

/// List referral links use case
pub struct ListReferralLinksUseCase<R>
where
    R: ReferralLinkRepository,
{
    link_repo: Arc<R>,
}

impl<R> ListReferralLinksUseCase<R>
where
    R: ReferralLinkRepository,
{
    pub fn new(link_repo: Arc<R>) -> Self {
        Self { link_repo }
    }

    pub async fn execute(&self, input: ListInput) -> ReferralResult<Page<ReferralLink>> {
        let cursor = Cursor::decode(input.cursor.as_deref())?;

        let page = self
            .link_repo
            .list_links_by_referrer(&input.user_id, input.limit, cursor)
            .await?;

        tracing::debug!(
            user_id = %input.user_id,
            returned = page.items.len(),
            has_more = page.next_cursor.is_some(),
            "Listed referral links"
        );

        Ok(page)
    }
}

//! In-Memory Repository Implementations
//!
//! Process-lifetime storage backed by [`KeyedStore`]. Cloning the repository
//! shares the underlying stores.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kernel::id::ReferralLinkId;
use platform::keyed_store::KeyedStore;
use platform::pagination::{Cursor, Page};
use uuid::Uuid;

use crate::domain::entities::{ReferralLink, ReferralSummary};
use crate::domain::repository::{ReferralLinkRepository, ReferralSummaryRepository};
use crate::error::{ReferralError, ReferralResult};

#[derive(Debug, Default)]
struct Stores {
    links: KeyedStore<ReferralLink>,
    summaries: KeyedStore<ReferralSummary>,
    /// vendor token → link id
    token_index: DashMap<String, Uuid>,
}

/// In-memory referral repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferralRepository {
    stores: Arc<Stores>,
}

impl InMemoryReferralRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_count(&self) -> usize {
        self.stores.links.len()
    }

    pub fn summary_count(&self) -> usize {
        self.stores.summaries.len()
    }
}

// ============================================================================
// Referral Link Repository Implementation
// ============================================================================

impl ReferralLinkRepository for InMemoryReferralRepository {
    async fn create_link(&self, link: &ReferralLink) -> ReferralResult<()> {
        // The index entry stays locked until the link is visible, so a token
        // lookup never sees an id without its link.
        match self.stores.token_index.entry(link.vendor_token.clone()) {
            Entry::Occupied(_) => Err(ReferralError::Conflict),
            Entry::Vacant(slot) => {
                self.stores.links.upsert(link.clone());
                slot.insert(link.id.into_uuid());
                tracing::debug!(referral_link_id = %link.id, "Stored referral link");
                Ok(())
            }
        }
    }

    async fn find_link_by_id(&self, id: &ReferralLinkId) -> ReferralResult<Option<ReferralLink>> {
        Ok(self.stores.links.get(id.as_uuid()))
    }

    async fn find_link_by_vendor_token(
        &self,
        vendor_token: &str,
    ) -> ReferralResult<Option<ReferralLink>> {
        let id = self
            .stores
            .token_index
            .get(vendor_token)
            .map(|entry| *entry.value());

        Ok(id.and_then(|id| self.stores.links.get(&id)))
    }

    async fn list_links_by_referrer(
        &self,
        referrer_user_id: &str,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> ReferralResult<Page<ReferralLink>> {
        Ok(self
            .stores
            .links
            .page(referrer_user_id, limit, cursor.as_ref()))
    }
}

// ============================================================================
// Referral Summary Repository Implementation
// ============================================================================

impl ReferralSummaryRepository for InMemoryReferralRepository {
    async fn upsert_summary(&self, summary: &ReferralSummary) -> ReferralResult<()> {
        self.stores.summaries.upsert(summary.clone());
        Ok(())
    }

    async fn find_latest_summary_for_link(
        &self,
        link_id: &ReferralLinkId,
    ) -> ReferralResult<Option<ReferralSummary>> {
        Ok(self
            .stores
            .summaries
            .find_latest(|summary| summary.referral_link_id == Some(*link_id)))
    }

    async fn list_summaries_by_referrer(
        &self,
        referrer_user_id: &str,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> ReferralResult<Page<ReferralSummary>> {
        Ok(self
            .stores
            .summaries
            .page(referrer_user_id, limit, cursor.as_ref()))
    }
}

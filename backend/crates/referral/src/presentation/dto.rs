//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use platform::pagination::Page;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{CreateReferralLinkOutput, ResolveReferralLinkOutput};
use crate::domain::entities::{ReferralLink, ReferralSummary};
use crate::domain::value_objects::{
    Destination, DestinationType, ReferralStatus, ShareChannel, SharePayload,
};

// ============================================================================
// Pagination
// ============================================================================

/// Query for the list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
    pub next_cursor: Option<String>,
}

/// One page of items
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T, D: From<T>> From<Page<T>> for PagedResponse<D> {
    fn from(page: Page<T>) -> Self {
        let page = page.map(D::from);
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

// ============================================================================
// Create Referral Link
// ============================================================================

/// Query for `POST /v1/referral-links`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferralLinkQuery {
    pub referrer_user_id: Option<String>,
    pub referrer_referral_code: Option<String>,
    pub channel: Option<ShareChannel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayloadDto {
    pub channel: ShareChannel,
    pub subject: Option<String>,
    pub message: String,
}

impl From<SharePayload> for SharePayloadDto {
    fn from(payload: SharePayload) -> Self {
        Self {
            channel: payload.channel,
            subject: payload.subject,
            message: payload.message,
        }
    }
}

/// Create referral link response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralLinkResponse {
    pub referral_link_id: Uuid,
    pub share_url: String,
    pub expires_at: DateTime<Utc>,
    pub share_payload: SharePayloadDto,
}

impl From<CreateReferralLinkOutput> for ReferralLinkResponse {
    fn from(output: CreateReferralLinkOutput) -> Self {
        Self {
            referral_link_id: output.referral_link_id.into_uuid(),
            share_url: output.share_url,
            expires_at: output.expires_at,
            share_payload: output.share_payload.into(),
        }
    }
}

// ============================================================================
// Referral Links / Summaries
// ============================================================================

/// Stored referral link
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralLinkDto {
    pub id: Uuid,
    pub referrer_user_id: String,
    pub referrer_referral_code: String,
    pub channel: ShareChannel,
    pub vendor_token: String,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub destination_type: Option<DestinationType>,
}

impl From<ReferralLink> for ReferralLinkDto {
    fn from(link: ReferralLink) -> Self {
        Self {
            id: link.id.into_uuid(),
            referrer_user_id: link.referrer_user_id,
            referrer_referral_code: link.referrer_referral_code,
            channel: link.channel,
            vendor_token: link.vendor_token,
            share_url: link.share_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            destination_type: link.destination_type,
        }
    }
}

/// Entry of "My Referrals"
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralSummaryDto {
    pub referral_id: Uuid,
    pub referrer_user_id: String,
    pub display_name: String,
    pub status: ReferralStatus,
    pub updated_at: DateTime<Utc>,
    pub referral_link_id: Option<Uuid>,
}

impl From<ReferralSummary> for ReferralSummaryDto {
    fn from(summary: ReferralSummary) -> Self {
        Self {
            referral_id: summary.id.into_uuid(),
            referrer_user_id: summary.referrer_user_id,
            display_name: summary.display_name,
            status: summary.status,
            updated_at: summary.updated_at,
            referral_link_id: summary.referral_link_id.map(|id| id.into_uuid()),
        }
    }
}

// ============================================================================
// Deep Link Resolve
// ============================================================================

/// Body of `POST /api/deeplinks/resolve`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDto {
    #[serde(rename = "type")]
    pub destination_type: DestinationType,
    pub title: String,
    pub body: String,
    pub primary_cta: String,
    pub secondary_cta: String,
}

impl From<Destination> for DestinationDto {
    fn from(dest: Destination) -> Self {
        Self {
            destination_type: dest.destination_type,
            title: dest.title,
            body: dest.body,
            primary_cta: dest.primary_cta,
            secondary_cta: dest.secondary_cta,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefillInfoDto {
    pub registration_referral_code: String,
}

/// Resolved referral
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub is_referred: bool,
    pub referral_code: String,
    pub destination: DestinationDto,
    pub prefill_info: PrefillInfoDto,
    pub referral_link_id: Uuid,
}

impl From<ResolveReferralLinkOutput> for ResolveResponse {
    fn from(output: ResolveReferralLinkOutput) -> Self {
        Self {
            is_referred: output.is_referred,
            referral_code: output.referral_code,
            destination: output.destination.into(),
            prefill_info: PrefillInfoDto {
                registration_referral_code: output.registration_referral_code,
            },
            referral_link_id: output.referral_link_id.into_uuid(),
        }
    }
}

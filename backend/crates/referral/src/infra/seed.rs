//! Development Seed Data
//!
//! Two live links and one expired link, plus one summary in each status,
//! so the list and resolve endpoints have something to show.

use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::{ReferralLinkId, ReferralSummaryId};
use uuid::Uuid;

use crate::domain::entities::{ReferralLink, ReferralSummary};
use crate::domain::repository::{ReferralLinkRepository, ReferralSummaryRepository};
use crate::domain::value_objects::{DestinationType, ReferralStatus, ShareChannel};
use crate::error::ReferralResult;

pub const SEED_LINK_1: ReferralLinkId =
    ReferralLinkId::from_uuid(Uuid::from_u128(0x11111111_1111_1111_1111_111111111111));
pub const SEED_LINK_2: ReferralLinkId =
    ReferralLinkId::from_uuid(Uuid::from_u128(0x22222222_2222_2222_2222_222222222222));
pub const SEED_LINK_EXPIRED: ReferralLinkId =
    ReferralLinkId::from_uuid(Uuid::from_u128(0x33333333_3333_3333_3333_333333333333));

fn seed_link(
    id: ReferralLinkId,
    user: &str,
    code: &str,
    channel: ShareChannel,
    token: &str,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> ReferralLink {
    ReferralLink {
        id,
        referrer_user_id: user.to_string(),
        referrer_referral_code: code.to_string(),
        channel,
        vendor_token: token.to_string(),
        share_url: format!("https://mock.vendor/dl/{token}"),
        created_at,
        expires_at,
        destination_type: Some(DestinationType::AuthGateReferral),
    }
}

fn seed_summary(
    id: u128,
    name: &str,
    status: ReferralStatus,
    updated_at: DateTime<Utc>,
    link: ReferralLinkId,
) -> ReferralSummary {
    ReferralSummary {
        id: ReferralSummaryId::from_uuid(Uuid::from_u128(id)),
        referrer_user_id: "mock-user-1".to_string(),
        display_name: name.to_string(),
        status,
        updated_at,
        referral_link_id: Some(link),
    }
}

/// Load the demo data set relative to `now`
pub async fn seed_demo_data<R>(repo: &R, now: DateTime<Utc>) -> ReferralResult<()>
where
    R: ReferralLinkRepository + ReferralSummaryRepository,
{
    let links = [
        seed_link(
            SEED_LINK_1,
            "mock-user-1",
            "XYZG4D",
            ShareChannel::Sms,
            "seed_tok_1",
            now - TimeDelta::minutes(30),
            now + TimeDelta::hours(12),
        ),
        seed_link(
            SEED_LINK_2,
            "mock-user-1",
            "XYZG4D",
            ShareChannel::Email,
            "seed_tok_2",
            now - TimeDelta::hours(2),
            now + TimeDelta::hours(6),
        ),
        seed_link(
            SEED_LINK_EXPIRED,
            "mock-user-2",
            "ABCD12",
            ShareChannel::CopyLink,
            "seed_tok_expired",
            now - TimeDelta::days(2),
            now - TimeDelta::hours(1),
        ),
    ];
    for link in &links {
        repo.create_link(link).await?;
    }

    let summaries = [
        seed_summary(
            0xaaaaaaaa_aaaa_aaaa_aaaa_aaaaaaaaaaaa,
            "Jenny S.",
            ReferralStatus::Complete,
            now - TimeDelta::days(1),
            SEED_LINK_2,
        ),
        seed_summary(
            0xbbbbbbbb_bbbb_bbbb_bbbb_bbbbbbbbbbbb,
            "Invited friend",
            ReferralStatus::Pending,
            now - TimeDelta::minutes(10),
            SEED_LINK_1,
        ),
        seed_summary(
            0xcccccccc_cccc_cccc_cccc_cccccccccccc,
            "Unknown",
            ReferralStatus::Expired,
            now - TimeDelta::days(3),
            SEED_LINK_1,
        ),
        seed_summary(
            0xdddddddd_dddd_dddd_dddd_dddddddddddd,
            "User",
            ReferralStatus::Invalid,
            now - TimeDelta::days(2),
            SEED_LINK_2,
        ),
    ];
    for summary in &summaries {
        repo.upsert_summary(summary).await?;
    }

    tracing::info!(
        links = links.len(),
        summaries = summaries.len(),
        "Seeded demo referral data"
    );

    Ok(())
}

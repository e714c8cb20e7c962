//! HTTP Handlers

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, State};
use platform::clock::Clock;
use serde_json::json;
use std::sync::Arc;

use crate::application::config::ReferralConfig;
use crate::application::{
    CreateReferralLinkInput, CreateReferralLinkUseCase, GetReferralLinkUseCase, ListInput,
    ListReferralLinksUseCase, ListReferralSummariesUseCase, ResolveReferralLinkUseCase,
};
use crate::domain::repository::{
    DeferredLinkVendor, ReferralLinkRepository, ReferralSummaryRepository,
};
use crate::error::{ReferralError, ReferralResult};
use crate::presentation::dto::{
    CreateReferralLinkQuery, ListQuery, PagedResponse, ReferralLinkDto, ReferralLinkResponse,
    ReferralSummaryDto, ResolveRequest, ResolveResponse,
};
use kernel::id::ReferralLinkId;

/// Shared state for referral handlers
#[derive(Clone)]
pub struct ReferralAppState<R, V>
where
    R: ReferralLinkRepository + ReferralSummaryRepository + Clone + Send + Sync + 'static,
    V: DeferredLinkVendor + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub vendor: Arc<V>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<ReferralConfig>,
}

// ============================================================================
// Extractors
// ============================================================================

/// `Query` whose rejection is reported as a validation error
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ReferralError))]
pub struct AppQuery<T>(pub T);

/// `Path` whose rejection is reported as a validation error
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ReferralError))]
pub struct AppPath<T>(pub T);

/// `Json` whose rejection is reported as a validation error
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ReferralError))]
pub struct AppJson<T>(pub T);

/// Value of a required parameter, rejected when blank but otherwise kept as sent
fn required(value: Option<String>, parameter_name: &str) -> ReferralResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ReferralError::missing_parameter(
            format!("{parameter_name} is required."),
            parameter_name,
        )),
    }
}

// ============================================================================
// Referral Links
// ============================================================================

/// POST /v1/referral-links
pub async fn create_link<R, V>(
    State(state): State<ReferralAppState<R, V>>,
    AppQuery(query): AppQuery<CreateReferralLinkQuery>,
) -> ReferralResult<Json<ReferralLinkResponse>>
where
    R: ReferralLinkRepository + ReferralSummaryRepository + Clone + Send + Sync + 'static,
    V: DeferredLinkVendor + Clone + Send + Sync + 'static,
{
    let input = CreateReferralLinkInput {
        referrer_user_id: required(query.referrer_user_id, "referrerUserId")?,
        referrer_referral_code: required(query.referrer_referral_code, "referrerReferralCode")?,
        channel: query
            .channel
            .ok_or_else(|| ReferralError::missing_parameter("channel is required.", "channel"))?,
    };

    let use_case = CreateReferralLinkUseCase::new(
        state.repo.clone(),
        state.vendor.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(input).await?;

    Ok(Json(output.into()))
}

/// GET /v1/referral-links
pub async fn list_links<R, V>(
    State(state): State<ReferralAppState<R, V>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> ReferralResult<Json<PagedResponse<ReferralLinkDto>>>
where
    R: ReferralLinkRepository + ReferralSummaryRepository + Clone + Send + Sync + 'static,
    V: DeferredLinkVendor + Clone + Send + Sync + 'static,
{
    let user_id = required(query.user_id, "userId")?;

    let use_case = ListReferralLinksUseCase::new(state.repo.clone());

    let page = use_case
        .execute(ListInput {
            user_id: user_id.clone(),
            limit: query.limit.unwrap_or(0),
            cursor: query.next_cursor,
        })
        .await?;

    if page.items.is_empty() {
        return Err(ReferralError::not_found(
            format!("No referral links found for user with id '{user_id}'."),
            json!({ "userId": user_id }),
        ));
    }

    Ok(Json(page.into()))
}

/// GET /v1/referral-links/{referralId}
pub async fn get_link<R, V>(
    State(state): State<ReferralAppState<R, V>>,
    AppPath(referral_id): AppPath<ReferralLinkId>,
) -> ReferralResult<Json<ReferralLinkDto>>
where
    R: ReferralLinkRepository + ReferralSummaryRepository + Clone + Send + Sync + 'static,
    V: DeferredLinkVendor + Clone + Send + Sync + 'static,
{
    let use_case = GetReferralLinkUseCase::new(state.repo.clone());

    let link = use_case.execute(referral_id).await?;

    Ok(Json(link.into()))
}

// ============================================================================
// Referral Summaries
// ============================================================================

/// GET /v1/referrals
pub async fn list_summaries<R, V>(
    State(state): State<ReferralAppState<R, V>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> ReferralResult<Json<PagedResponse<ReferralSummaryDto>>>
where
    R: ReferralLinkRepository + ReferralSummaryRepository + Clone + Send + Sync + 'static,
    V: DeferredLinkVendor + Clone + Send + Sync + 'static,
{
    let user_id = required(query.user_id, "userId")?;

    let use_case = ListReferralSummariesUseCase::new(state.repo.clone());

    let page = use_case
        .execute(ListInput {
            user_id: user_id.clone(),
            limit: query.limit.unwrap_or(0),
            cursor: query.next_cursor,
        })
        .await?;

    if page.items.is_empty() {
        return Err(ReferralError::not_found(
            format!("No referrals found for user with id '{user_id}'."),
            json!({ "userId": user_id }),
        ));
    }

    Ok(Json(page.into()))
}

// ============================================================================
// Deep Link Resolve
// ============================================================================

/// POST /api/deeplinks/resolve
///
/// Public: called on first app launch, before the user has an account.
pub async fn resolve<R, V>(
    State(state): State<ReferralAppState<R, V>>,
    AppJson(req): AppJson<ResolveRequest>,
) -> ReferralResult<Json<ResolveResponse>>
where
    R: ReferralLinkRepository + ReferralSummaryRepository + Clone + Send + Sync + 'static,
    V: DeferredLinkVendor + Clone + Send + Sync + 'static,
{
    let use_case = ResolveReferralLinkUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(req.token.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(output.into()))
}

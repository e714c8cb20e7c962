//! Referral Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::clock::{Clock, SystemClock};
use platform::rate_limit::{FixedWindowRateLimiter, RateLimitStore};
use std::sync::Arc;

use crate::application::config::ReferralConfig;
use crate::domain::repository::{
    DeferredLinkVendor, ReferralLinkRepository, ReferralSummaryRepository,
};
use crate::infra::memory::InMemoryReferralRepository;
use crate::infra::vendor::MockDeferredLinkVendor;
use crate::presentation::handlers::{self, ReferralAppState};
use crate::presentation::middleware::{RateLimitState, enforce_rate_limit, trace_id};

/// Create the referral router with the in-memory repository and mock vendor
pub fn referral_router(
    repo: InMemoryReferralRepository,
    vendor: MockDeferredLinkVendor,
    config: ReferralConfig,
) -> Router {
    let limiter = FixedWindowRateLimiter::new(config.rate_limit.clone());
    referral_router_generic(repo, vendor, limiter, Arc::new(SystemClock), config)
}

/// Create a generic referral router for any repository, vendor and limiter
///
/// Issue and resolve are rate limited; the read endpoints are not.
pub fn referral_router_generic<R, V, L>(
    repo: R,
    vendor: V,
    limiter: L,
    clock: Arc<dyn Clock>,
    config: ReferralConfig,
) -> Router
where
    R: ReferralLinkRepository + ReferralSummaryRepository + Clone + Send + Sync + 'static,
    V: DeferredLinkVendor + Clone + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let state = ReferralAppState {
        repo: Arc::new(repo),
        vendor: Arc::new(vendor),
        clock,
        config: Arc::new(config),
    };

    let rate_limit = RateLimitState {
        limiter: Arc::new(limiter),
    };

    let limited = Router::new()
        .route("/v1/referral-links", post(handlers::create_link::<R, V>))
        .route("/api/deeplinks/resolve", post(handlers::resolve::<R, V>))
        .route_layer(middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit::<L>,
        ));

    Router::new()
        .route("/v1/referral-links", get(handlers::list_links::<R, V>))
        .route(
            "/v1/referral-links/{referral_id}",
            get(handlers::get_link::<R, V>),
        )
        .route("/v1/referrals", get(handlers::list_summaries::<R, V>))
        .merge(limited)
        .with_state(state)
        .layer(middleware::from_fn(trace_id))
}

//! Referral Middleware
//!
//! - `enforce_rate_limit`: fixed-window budget per route and client IP
//! - `trace_id`: request span plus an `X-Trace-Id` header on every response

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::{client_key, extract_client_ip};
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ReferralError;

pub static X_TRACE_ID: HeaderName = HeaderName::from_static("x-trace-id");

/// Middleware state
pub struct RateLimitState<L>
where
    L: RateLimitStore + Send + Sync + 'static,
{
    pub limiter: Arc<L>,
}

// `L` itself need not be `Clone`
impl<L> Clone for RateLimitState<L>
where
    L: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            limiter: self.limiter.clone(),
        }
    }
}

/// Middleware that rejects clients over their request budget with 429
pub async fn enforce_rate_limit<L>(
    State(state): State<RateLimitState<L>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    L: RateLimitStore + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let client_ip = extract_client_ip(req.headers(), direct_ip);
    let key = client_key(req.uri().path(), client_ip);

    let decision = state.limiter.check(&key).await;
    if !decision.allowed {
        tracing::debug!(key = %key, retry_after_secs = decision.retry_after_secs, "Rate limited");
        return Err(ReferralError::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        }
        .into_response());
    }

    Ok(next.run(req).await)
}

/// Middleware that tags each request with a fresh trace id
pub async fn trace_id(req: Request<Body>, next: Next) -> Response {
    let trace_id = Uuid::new_v4().simple().to_string();

    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(X_TRACE_ID.clone(), value);
    }

    response
}

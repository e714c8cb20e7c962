//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::ReferralAppState;
pub use middleware::{RateLimitState, X_TRACE_ID, enforce_rate_limit, trace_id};
pub use router::{referral_router, referral_router_generic};

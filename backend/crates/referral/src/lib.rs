//! Referral Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, copy, repository traits
//! - `application/` - Use cases
//! - `infra/` - In-memory repositories, mock vendor, seed data
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Flow
//! - A referrer asks for a link: the vendor mints a deferred deep link, the
//!   link is stored with a TTL, and a channel-specific share text is returned
//! - The referred user installs the app and presents the vendor token on
//!   first launch: the link is checked for expiry and a PENDING referral
//!   summary is recorded for the referrer
//! - Both links and summaries are listed per user with opaque cursors

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ReferralConfig;
pub use error::{ReferralError, ReferralResult};
pub use infra::{InMemoryReferralRepository, MockDeferredLinkVendor, seed_demo_data};
pub use presentation::router::{referral_router, referral_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

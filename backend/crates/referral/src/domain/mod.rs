//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (ReferralLink, ReferralSummary)
//! - Domain value objects (ShareChannel, DestinationType, ReferralStatus)
//! - Domain services (share payload and destination copy)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

// Re-exports
pub use entities::{ReferralLink, ReferralSummary};
pub use repository::{
    DeferredLinkVendor, ReferralLinkRepository, ReferralSummaryRepository, VendorError,
};

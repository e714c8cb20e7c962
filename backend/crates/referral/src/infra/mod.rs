//! Infrastructure Layer
//!
//! In-memory repositories, the mock vendor, and development seed data.

pub mod memory;
pub mod seed;
pub mod vendor;

pub use memory::InMemoryReferralRepository;
pub use seed::seed_demo_data;
pub use vendor::MockDeferredLinkVendor;

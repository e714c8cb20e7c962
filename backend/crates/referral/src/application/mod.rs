//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create_link;
pub mod get_link;
pub mod list_links;
pub mod list_summaries;
pub mod resolve_link;

// Re-exports
pub use config::ReferralConfig;
pub use create_link::{CreateReferralLinkInput, CreateReferralLinkOutput, CreateReferralLinkUseCase};
pub use get_link::GetReferralLinkUseCase;
pub use list_links::{ListInput, ListReferralLinksUseCase};
pub use list_summaries::ListReferralSummariesUseCase;
pub use resolve_link::{ResolveReferralLinkOutput, ResolveReferralLinkUseCase};

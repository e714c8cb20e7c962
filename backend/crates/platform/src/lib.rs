//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Time source abstraction
//! - URL-safe Base64 and random tokens
//! - Cursor pagination and the keyed in-memory store
//! - Rate limiting infrastructure
//! - Client identification

pub mod client;
pub mod clock;
pub mod crypto;
pub mod keyed_store;
pub mod pagination;
pub mod rate_limit;

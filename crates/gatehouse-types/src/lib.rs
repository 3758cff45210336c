//! Gatehouse Types - Shared domain types
//!
//! This crate contains domain types used across Gatehouse services:
//! - Principal identity and role namespaces
//! - Session identifiers
//! - The authorized envelope returned by every auth flow

pub mod envelope;
pub mod principal;
pub mod role;
pub mod session;

pub use envelope::*;
pub use principal::*;
pub use role::*;
pub use session::*;

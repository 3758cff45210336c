//! Common test utilities for gatehouse-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::{MockPrincipalRepository, MockSessionRepository};

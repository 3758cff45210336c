//! Gatehouse Store - Storage abstractions
//!
//! SQLx-based storage layer for Gatehouse services.
//!
//! # Example
//!
//! ```rust,ignore
//! use gatehouse_store::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/gatehouse", 10).await?;
//! let repos = Repositories::new(pool);
//!
//! let principal = repos.principals.find_active("member", "a@x.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;

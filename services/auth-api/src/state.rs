//! Application state

use std::ops::Deref;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use gatehouse_auth_core::AuthService;
use gatehouse_store::pg::{PgPrincipalRepository, PgSessionRepository};
use gatehouse_store::{DbPool, Repositories};

use crate::config::Config;

/// Type alias for the auth service with concrete repository types
pub type AuthServiceImpl = AuthService<PgPrincipalRepository, PgSessionRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Shared marker for the background session sweeper, reported by the
/// readiness probe. Zero means the sweeper has not completed a run yet.
#[derive(Clone, Default)]
pub struct SweeperHandle(Arc<AtomicI64>);

impl SweeperHandle {
    /// Record that a sweep just completed
    pub fn mark(&self) {
        self.0.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    /// When the last sweep completed, if any
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        match self.0.load(Ordering::Relaxed) {
            0 => None,
            secs => Utc.timestamp_opt(secs, 0).single(),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for the join/login/refresh/revoke flows
    pub auth: Arc<AuthServiceImpl>,
    /// Database repositories
    pub repos: Repositories,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Background sweeper marker
    pub sweeper: SweeperHandle,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        auth: AuthServiceImpl,
        repos: Repositories,
        pool: DbPool,
        sweeper: SweeperHandle,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            repos,
            pool: SharedPool(Arc::new(pool)),
            sweeper,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweeper_handle_reports_runs() {
        let handle = SweeperHandle::default();
        assert!(handle.last_run().is_none());

        handle.mark();
        let last = handle.last_run().expect("mark records a run");
        assert!((Utc::now() - last).num_seconds() < 5);
    }
}

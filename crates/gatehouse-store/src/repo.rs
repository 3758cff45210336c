//! Repository traits
//!
//! Define async repository interfaces for storage operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{PrincipalRow, SessionRow};

/// Principal repository trait
///
/// `(role, external_key)` is unique among all rows, soft-deleted ones
/// included: a deleted account keeps its key reserved.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Create a new principal. Fails with `StoreError::DuplicateKey` when
    /// `(role, external_key)` already exists among active-or-deleted rows.
    async fn create(&self, principal: NewPrincipal) -> StoreResult<PrincipalRow>;

    /// Find a non-deleted principal by role and external key
    async fn find_active(&self, role: &str, external_key: &str)
        -> StoreResult<Option<PrincipalRow>>;

    /// Find a principal by role and ID (soft-deleted rows included)
    async fn find_by_id(&self, role: &str, id: Uuid) -> StoreResult<Option<PrincipalRow>>;

    /// Soft-delete a principal. Fails with `StoreError::NotFound` when no
    /// live row matches; a second call on the same principal must fail.
    async fn soft_delete(&self, role: &str, id: Uuid) -> StoreResult<()>;
}

/// Create principal input
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub id: Uuid,
    pub role: String,
    pub external_key: String,
    pub credential: Option<String>,
}

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Open a new session
    async fn create(&self, session: NewSession) -> StoreResult<SessionRow>;

    /// Find the current session for a refresh fingerprint, excluding
    /// revoked and expired rows
    async fn find_current(&self, refresh_fingerprint: &str) -> StoreResult<Option<SessionRow>>;

    /// Atomically revoke `old_id` and create its replacement.
    ///
    /// The revocation is a check-and-set on the old row (must still be
    /// current); fails with `StoreError::NotFound` when the old session
    /// was already revoked, rotated away, or expired. At most one of two
    /// concurrent rotations of the same session succeeds.
    async fn rotate(&self, old_id: Uuid, replacement: NewSession) -> StoreResult<SessionRow>;

    /// Revoke a session. Idempotent.
    async fn revoke(&self, id: Uuid) -> StoreResult<()>;

    /// Revoke all open sessions for a principal
    async fn revoke_all_for_principal(&self, principal_id: Uuid) -> StoreResult<u64>;

    /// Find all sessions for a principal
    async fn find_by_principal(&self, principal_id: Uuid) -> StoreResult<Vec<SessionRow>>;

    /// Delete expired and revoked sessions
    async fn delete_expired(&self) -> StoreResult<u64>;
}

/// Create session input
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: Uuid,
    pub principal_id: Uuid,
    pub role: String,
    pub refresh_fingerprint: String,
    pub expires_at: DateTime<Utc>,
}

impl NewSession {
    /// Build a session row the way the repositories materialize it
    pub fn into_row(self, issued_at: DateTime<Utc>) -> SessionRow {
        SessionRow {
            id: self.id,
            principal_id: self.principal_id,
            role: self.role,
            refresh_fingerprint: self.refresh_fingerprint,
            issued_at,
            expires_at: self.expires_at,
            revoked_at: None,
        }
    }
}

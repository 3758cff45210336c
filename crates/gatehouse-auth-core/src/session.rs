//! Session management
//!
//! One session backs one refresh-token chain. Rotation atomically
//! supersedes the chain's current row; revocation ends it.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

use gatehouse_store::{NewSession, SessionRepository, SessionRow, StoreError};
use gatehouse_types::{PrincipalId, RoleTag, SessionId};

use crate::fingerprint::{fingerprint, fingerprint_matches};
use crate::AuthError;

/// Session manager over a session repository
#[derive(Clone)]
pub struct SessionManager<R: SessionRepository> {
    repo: Arc<R>,
    refresh_ttl: Duration,
}

impl<R: SessionRepository> SessionManager<R> {
    /// Create a new session manager
    pub fn new(repo: Arc<R>, refresh_ttl: Duration) -> Self {
        Self { repo, refresh_ttl }
    }

    fn expiry(&self) -> chrono::DateTime<Utc> {
        Utc::now() + ChronoDuration::seconds(self.refresh_ttl.as_secs() as i64)
    }

    /// Open a new session for a freshly issued refresh token
    pub async fn open(
        &self,
        session_id: SessionId,
        principal_id: PrincipalId,
        role: &RoleTag,
        refresh_token: &str,
    ) -> Result<SessionRow, AuthError> {
        let session = self
            .repo
            .create(NewSession {
                id: session_id.0,
                principal_id: principal_id.0,
                role: role.to_string(),
                refresh_fingerprint: fingerprint(refresh_token),
                expires_at: self.expiry(),
            })
            .await?;

        Ok(session)
    }

    /// Find the current session for a raw refresh token. Revoked and
    /// expired rows are excluded, and the stored fingerprint is
    /// re-checked against the presented token in constant time.
    pub async fn current(&self, refresh_token: &str) -> Result<Option<SessionRow>, AuthError> {
        let session = self.repo.find_current(&fingerprint(refresh_token)).await?;
        Ok(session.filter(|s| fingerprint_matches(refresh_token, &s.refresh_fingerprint)))
    }

    /// Rotate a session: atomically revoke the old row and open its
    /// replacement for the new refresh token.
    ///
    /// Fails with `AuthError::SessionInvalid` when the old session is no
    /// longer current, including when a concurrent rotation won the
    /// check-and-set first.
    pub async fn rotate(
        &self,
        old_id: SessionId,
        new_id: SessionId,
        principal_id: PrincipalId,
        role: &RoleTag,
        new_refresh_token: &str,
    ) -> Result<SessionRow, AuthError> {
        let replacement = NewSession {
            id: new_id.0,
            principal_id: principal_id.0,
            role: role.to_string(),
            refresh_fingerprint: fingerprint(new_refresh_token),
            expires_at: self.expiry(),
        };

        match self.repo.rotate(old_id.0, replacement).await {
            Ok(session) => Ok(session),
            Err(StoreError::NotFound) => {
                tracing::warn!(session_id = %old_id, "Session rotation lost to a concurrent rotation or revocation");
                Err(AuthError::SessionInvalid)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Revoke a session. Idempotent.
    pub async fn revoke(&self, session_id: SessionId) -> Result<(), AuthError> {
        self.repo.revoke(session_id.0).await?;
        Ok(())
    }

    /// Revoke all open sessions for a principal. Returns how many were
    /// revoked.
    pub async fn revoke_all(&self, principal_id: PrincipalId) -> Result<u64, AuthError> {
        let count = self.repo.revoke_all_for_principal(principal_id.0).await?;
        Ok(count)
    }

    /// List all sessions for a principal
    pub async fn sessions_for(&self, principal_id: PrincipalId) -> Result<Vec<SessionRow>, AuthError> {
        let sessions = self.repo.find_by_principal(principal_id.0).await?;
        Ok(sessions)
    }
}

impl<R: SessionRepository> std::fmt::Debug for SessionManager<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

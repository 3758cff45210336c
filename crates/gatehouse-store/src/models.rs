//! Storage row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use gatehouse_types::{PrincipalId, SessionId};

/// Principal row: one account within one role namespace
#[derive(Debug, Clone, FromRow)]
pub struct PrincipalRow {
    pub id: Uuid,
    pub role: String,
    pub external_key: String,
    /// Password hash; absent for federated-only roles
    pub credential: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PrincipalRow {
    /// Convert to domain PrincipalId
    pub fn principal_id(&self) -> PrincipalId {
        PrincipalId(self.id)
    }

    /// Whether this principal may authenticate
    pub fn is_active(&self) -> bool {
        self.status == "active" && self.deleted_at.is_none()
    }
}

/// Session row: the server-side record backing one refresh-token chain
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub principal_id: Uuid,
    pub role: String,
    /// SHA-256 fingerprint of the currently-valid refresh token;
    /// the raw token is never stored at rest
    pub refresh_fingerprint: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    /// Convert to domain SessionId
    pub fn session_id(&self) -> SessionId {
        SessionId(self.id)
    }

    /// Convert to domain PrincipalId
    pub fn principal_id(&self) -> PrincipalId {
        PrincipalId(self.principal_id)
    }

    /// Whether the session has expired. An expired session is treated
    /// identically to a revoked one.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether the session is current (not revoked, not expired)
    pub fn is_current(&self) -> bool {
        self.revoked_at.is_none() && !self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> SessionRow {
        let now = Utc::now();
        SessionRow {
            id: Uuid::new_v4(),
            principal_id: Uuid::new_v4(),
            role: "member".to_string(),
            refresh_fingerprint: "fp".to_string(),
            issued_at: now,
            expires_at: now + expires_in,
            revoked_at: revoked.then(|| now),
        }
    }

    #[test]
    fn test_session_current() {
        assert!(session(Duration::hours(1), false).is_current());
    }

    #[test]
    fn test_session_expired_not_current() {
        let s = session(Duration::seconds(-1), false);
        assert!(s.is_expired());
        assert!(!s.is_current());
    }

    #[test]
    fn test_session_revoked_not_current() {
        assert!(!session(Duration::hours(1), true).is_current());
    }

    #[test]
    fn test_principal_active() {
        let now = Utc::now();
        let mut p = PrincipalRow {
            id: Uuid::new_v4(),
            role: "member".to_string(),
            external_key: "a@x.com".to_string(),
            credential: None,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        assert!(p.is_active());

        p.status = "deactivated".to_string();
        assert!(!p.is_active());

        p.status = "active".to_string();
        p.deleted_at = Some(now);
        assert!(!p.is_active());
    }
}

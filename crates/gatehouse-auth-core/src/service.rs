//! Auth service - orchestrates the Join, Login, Refresh, and Revoke flows
//!
//! One parameterized service serves every role namespace. Each flow runs
//! as a single request-scoped unit of work; every failure is terminal for
//! that call and nothing is retried internally.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;

use gatehouse_store::{NewPrincipal, PrincipalRepository, PrincipalRow, SessionRepository, SessionRow};
use gatehouse_types::{AuthPrincipal, Authorized, PrincipalId, RolePolicy, RoleTag, SessionId, TokenBundle};

use crate::{
    config::AuthConfig,
    password::PasswordVerifier,
    session::SessionManager,
    token::{TokenCodec, TokenKind},
    AuthError,
};

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service
///
/// Provides the four flows every role-scoped caller goes through:
/// - Join: register, open a session, return an authorized envelope
/// - Login: verify credentials, open a fresh session
/// - Refresh: rotate a refresh-token chain
/// - Revoke: deactivate a principal and cascade-revoke its sessions
pub struct AuthService<P: PrincipalRepository, S: SessionRepository> {
    config: AuthConfig,
    principals: Arc<P>,
    sessions: SessionManager<S>,
    password: PasswordVerifier,
    codec: TokenCodec,
}

impl<P: PrincipalRepository, S: SessionRepository> AuthService<P, S> {
    /// Create a new auth service
    pub fn new(config: AuthConfig, principals: Arc<P>, session_repo: Arc<S>) -> Self {
        Self {
            codec: TokenCodec::new(&config),
            sessions: SessionManager::new(session_repo, config.refresh_ttl),
            password: PasswordVerifier::new(),
            principals,
            config,
        }
    }

    /// Override the password verifier (tests use cheaper Argon2 params)
    pub fn with_password_verifier(mut self, password: PasswordVerifier) -> Self {
        self.password = password;
        self
    }

    // =========================================================================
    // Join
    // =========================================================================

    /// Register a new principal in a role namespace and return an
    /// authorized envelope.
    ///
    /// Fails with `AlreadyRegistered` when `(role, external_key)` is
    /// taken; soft-deleted rows keep their key reserved.
    pub async fn join(
        &self,
        role: &RoleTag,
        external_key: &str,
        credential: Option<&str>,
    ) -> Result<Authorized, AuthError> {
        let external_key = external_key.trim();
        if external_key.is_empty() {
            return Err(AuthError::Validation("external key is required".to_string()));
        }

        let stored_credential = match self.config.policy_for(role) {
            RolePolicy::Password => {
                let plaintext = credential.ok_or_else(|| {
                    AuthError::Validation("credential is required for this role".to_string())
                })?;
                if plaintext.len() < MIN_PASSWORD_LENGTH {
                    return Err(AuthError::Validation(format!(
                        "credential must be at least {MIN_PASSWORD_LENGTH} characters"
                    )));
                }
                Some(self.password.hash(plaintext)?)
            }
            RolePolicy::Federated => {
                if credential.is_some() {
                    return Err(AuthError::Validation(
                        "this role does not accept a credential".to_string(),
                    ));
                }
                None
            }
        };

        let principal = self
            .principals
            .create(NewPrincipal {
                id: PrincipalId::new().0,
                role: role.to_string(),
                external_key: external_key.to_string(),
                credential: stored_credential,
            })
            .await?;

        tracing::info!(role = %role, principal_id = %principal.id, "Principal joined");

        self.authorize(&principal).await
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Authenticate an existing principal and open a fresh session.
    ///
    /// Unknown account, deactivated account, and wrong password all fail
    /// with the same `InvalidCredentials`; nothing distinguishes them to
    /// the caller.
    ///
    /// For federated roles the external provider assertion is verified
    /// upstream; this flow checks existence and status only.
    pub async fn login(
        &self,
        role: &RoleTag,
        external_key: &str,
        credential: Option<&str>,
    ) -> Result<Authorized, AuthError> {
        // Keys are stored trimmed at join, so look up the trimmed form
        let external_key = external_key.trim();
        let principal = self
            .principals
            .find_active(role.as_str(), external_key)
            .await?
            .ok_or_else(|| {
                tracing::debug!(role = %role, "Login for unknown external key");
                AuthError::InvalidCredentials
            })?;

        if !principal.is_active() {
            tracing::debug!(principal_id = %principal.id, "Login for deactivated principal");
            return Err(AuthError::InvalidCredentials);
        }

        if self.config.policy_for(role) == RolePolicy::Password {
            let plaintext = credential.ok_or(AuthError::InvalidCredentials)?;
            let Some(stored) = principal.credential.as_deref() else {
                tracing::debug!(principal_id = %principal.id, "No credential on record");
                return Err(AuthError::InvalidCredentials);
            };
            if !self.password.verify(plaintext, stored) {
                tracing::debug!(principal_id = %principal.id, "Password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
        }

        self.authorize(&principal).await
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Redeem a refresh token for a new pair, rotating the session.
    ///
    /// A token that is malformed, forged, expired, or of the wrong kind
    /// fails `InvalidToken`. A well-formed token whose session is revoked,
    /// superseded, or expired fails `SessionInvalid`, which is what makes
    /// reuse of a rotated-away token detectable. Of two concurrent
    /// refreshes with the same token, at most one succeeds.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Authorized, AuthError> {
        let claims = self.codec.verify(refresh_token, TokenKind::Refresh)?;

        let session = self
            .sessions
            .current(refresh_token)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Refresh token is not current (revoked, superseded, or expired)");
                AuthError::SessionInvalid
            })?;

        // The token must be bound to the session it resolves to
        if claims.sid != Some(session.id) {
            tracing::debug!(session_id = %session.id, "Refresh token session binding mismatch");
            return Err(AuthError::SessionInvalid);
        }

        let principal = self
            .principals
            .find_by_id(&session.role, session.principal_id)
            .await?
            .filter(PrincipalRow::is_active)
            .ok_or_else(|| {
                tracing::debug!(session_id = %session.id, "Session principal no longer active");
                AuthError::SessionInvalid
            })?;

        let role = RoleTag::from(principal.role.clone());
        let new_session_id = SessionId::new();
        let (access, refresh) =
            self.issue_pair(principal.principal_id(), &role, new_session_id)?;

        self.sessions
            .rotate(
                session.session_id(),
                new_session_id,
                principal.principal_id(),
                &role,
                &refresh,
            )
            .await?;

        Ok(self.envelope(&principal, access, refresh))
    }

    // =========================================================================
    // Revoke
    // =========================================================================

    /// Deactivate a principal and cascade-revoke all of its open
    /// sessions. Returns how many sessions were revoked.
    ///
    /// Not idempotent: a second call on the same principal fails
    /// `NotFound`.
    pub async fn deactivate(
        &self,
        role: &RoleTag,
        principal_id: PrincipalId,
    ) -> Result<u64, AuthError> {
        self.principals
            .soft_delete(role.as_str(), principal_id.0)
            .await?;

        let revoked = self.sessions.revoke_all(principal_id).await?;
        tracing::info!(role = %role, principal_id = %principal_id, revoked, "Principal deactivated");

        Ok(revoked)
    }

    /// End one session (logout). Idempotent: a token whose session is
    /// already gone still succeeds, but the token itself must verify.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.codec.verify(refresh_token, TokenKind::Refresh)?;

        if let Some(session) = self.sessions.current(refresh_token).await? {
            self.sessions.revoke(session.session_id()).await?;
        }

        Ok(())
    }

    // =========================================================================
    // Authenticated-request surface
    // =========================================================================

    /// Decode the principal behind an inbound bearer access token.
    ///
    /// This is what role-scoped CRUD providers call before touching any
    /// domain data; failure means the request is unauthenticated.
    pub fn authenticate(&self, access_token: &str) -> Result<AuthPrincipal, AuthError> {
        let claims = self.codec.verify(access_token, TokenKind::Access)?;
        let id = PrincipalId::parse(&claims.sub).map_err(|_| {
            tracing::debug!("Access token subject is not a valid principal id");
            AuthError::InvalidToken
        })?;

        Ok(AuthPrincipal {
            id,
            role: RoleTag::from(claims.role),
        })
    }

    /// List all sessions for a principal
    pub async fn sessions_for(
        &self,
        principal_id: PrincipalId,
    ) -> Result<Vec<SessionRow>, AuthError> {
        self.sessions.sessions_for(principal_id).await
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Shared issuance path: open a session and wrap the principal in an
    /// authorized envelope.
    async fn authorize(&self, principal: &PrincipalRow) -> Result<Authorized, AuthError> {
        let role = RoleTag::from(principal.role.clone());
        let session_id = SessionId::new();
        let (access, refresh) = self.issue_pair(principal.principal_id(), &role, session_id)?;

        self.sessions
            .open(session_id, principal.principal_id(), &role, &refresh)
            .await?;

        Ok(self.envelope(principal, access, refresh))
    }

    fn issue_pair(
        &self,
        principal_id: PrincipalId,
        role: &RoleTag,
        session_id: SessionId,
    ) -> Result<(String, String), AuthError> {
        let access = self
            .codec
            .issue_access(principal_id, role, self.config.access_ttl)?;
        let refresh =
            self.codec
                .issue_refresh(principal_id, role, session_id, self.config.refresh_ttl)?;
        Ok((access, refresh))
    }

    fn envelope(&self, principal: &PrincipalRow, access: String, refresh: String) -> Authorized {
        let now = Utc::now();
        Authorized {
            id: principal.principal_id(),
            role: RoleTag::from(principal.role.clone()),
            external_key: principal.external_key.clone(),
            created_at: principal.created_at,
            token: TokenBundle {
                access,
                refresh,
                expired_at: now + ChronoDuration::seconds(self.config.access_ttl.as_secs() as i64),
                refreshable_until: now
                    + ChronoDuration::seconds(self.config.refresh_ttl.as_secs() as i64),
            },
        }
    }
}

impl<P: PrincipalRepository, S: SessionRepository> std::fmt::Debug for AuthService<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

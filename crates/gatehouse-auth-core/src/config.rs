//! Configuration types for the auth service

use std::collections::HashSet;
use std::time::Duration;

use gatehouse_types::{RolePolicy, RoleTag};

use crate::AuthError;

/// Minimum signing-secret length in bytes (256 bits)
pub const MIN_SECRET_LENGTH: usize = 32;

/// Auth service configuration
///
/// The signing secret is injected here at construction; there is no
/// ambient/global signing state, so multiple logical deployments (or
/// tests) can run with independent keys concurrently.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access and refresh tokens
    pub token_secret: String,
    /// Token issuer (iss claim)
    pub issuer: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token / session lifetime
    pub refresh_ttl: Duration,
    /// Role namespaces that authenticate via an external provider and
    /// never store a password
    federated_roles: HashSet<String>,
}

impl AuthConfig {
    /// Create a new auth config with default token lifetimes
    /// (15 minute access, 7 day refresh).
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` if the secret is shorter than
    /// 32 bytes.
    pub fn try_new(
        token_secret: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let token_secret = token_secret.into();
        if token_secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::Configuration(format!(
                "token secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }

        Ok(Self {
            token_secret,
            issuer: issuer.into(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            federated_roles: HashSet::new(),
        })
    }

    /// Set the access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set the refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Mark a role namespace as federated (no stored password)
    pub fn with_federated_role(mut self, role: impl Into<String>) -> Self {
        self.federated_roles.insert(role.into());
        self
    }

    /// How the given role namespace authenticates. Roles default to
    /// local passwords.
    pub fn policy_for(&self, role: &RoleTag) -> RolePolicy {
        if self.federated_roles.contains(role.as_str()) {
            RolePolicy::Federated
        } else {
            RolePolicy::Password
        }
    }
}

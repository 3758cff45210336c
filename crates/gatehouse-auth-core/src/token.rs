//! Token codec
//!
//! Signs and verifies the compact tokens carried by clients: short-lived
//! access tokens and session-bound refresh tokens, both HS256 JWTs signed
//! with the injected process secret.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use gatehouse_types::{PrincipalId, RoleTag, SessionId};

use crate::{AuthConfig, AuthError};

/// What a token is good for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived bearer token for authenticated requests
    Access,
    /// Long-lived token redeemable for a new pair, bound to one session
    Refresh,
}

/// Claims carried by every Gatehouse token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Principal ID
    pub sub: String,
    /// Role namespace
    pub role: String,
    /// Token kind
    pub kind: TokenKind,
    /// Session ID; present on refresh tokens only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<Uuid>,
    /// Unique token ID
    pub jti: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// Token codec with an injected signing secret.
///
/// Verification rejects tokens whose signature, kind, or expiry fail
/// without leaking which check failed: callers always see the uniform
/// `AuthError::InvalidToken`, the detailed reason goes to the debug log.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl TokenCodec {
    /// Create a codec from a validated config
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            issuer: config.issuer.clone(),
        }
    }

    /// Issue a signed access token
    pub fn issue_access(
        &self,
        principal_id: PrincipalId,
        role: &RoleTag,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        self.issue(TokenKind::Access, principal_id, role, None, ttl)
    }

    /// Issue a signed refresh token bound to a session
    pub fn issue_refresh(
        &self,
        principal_id: PrincipalId,
        role: &RoleTag,
        session_id: SessionId,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        self.issue(TokenKind::Refresh, principal_id, role, Some(session_id.0), ttl)
    }

    fn issue(
        &self,
        kind: TokenKind,
        principal_id: PrincipalId,
        role: &RoleTag,
        sid: Option<Uuid>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: principal_id.to_string(),
            role: role.to_string(),
            kind,
            sid,
            jti: generate_token_id(),
            iat,
            exp: iat + ttl.as_secs() as i64,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            AuthError::Internal("token encoding failed".to_string())
        })
    }

    /// Verify a token and check it is of the expected kind.
    ///
    /// Malformed, empty, expired, forged, and wrong-kind tokens all fail
    /// with the same `AuthError::InvalidToken`.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token validation failed: {}", e);
            AuthError::InvalidToken
        })?;

        if data.claims.kind != expected {
            tracing::debug!(
                "Token kind mismatch: expected {:?}, got {:?}",
                expected,
                data.claims.kind
            );
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

/// Generate a unique token ID (128 bits from the OS CSPRNG)
fn generate_token_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

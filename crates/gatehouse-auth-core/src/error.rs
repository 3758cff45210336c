//! Auth errors

use thiserror::Error;

use gatehouse_store::StoreError;

/// Authentication errors
///
/// All of these are terminal, user-visible failures returned synchronously
/// to the caller; none are retried internally.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed input (missing credential, empty key, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// `(role, external_key)` already registered, soft-deleted rows included
    #[error("already registered")]
    AlreadyRegistered,

    /// Login failed. Deliberately ambiguous between unknown account and
    /// wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token rejected. Deliberately ambiguous across malformed, expired,
    /// wrong-kind, and bad-signature sub-causes.
    #[error("invalid token")]
    InvalidToken,

    /// Refresh token not current: revoked, superseded, or expired
    #[error("session invalid")]
    SessionInvalid,

    /// Operating on an already-deleted or nonexistent principal
    #[error("not found")]
    NotFound,

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Storage error
    #[error("storage error: {0}")]
    Database(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::AlreadyRegistered => 409,
            Self::InvalidCredentials | Self::InvalidToken | Self::SessionInvalid => 401,
            Self::NotFound => 404,
            Self::Configuration(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::SessionInvalid => "SESSION_INVALID",
            Self::NotFound => "NOT_FOUND",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey => Self::AlreadyRegistered,
            StoreError::NotFound => Self::NotFound,
            StoreError::Sqlx(e) => {
                tracing::error!("Storage error: {}", e);
                Self::Database(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_map_to_401() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::InvalidToken.status_code(), 401);
        assert_eq!(AuthError::SessionInvalid.status_code(), 401);
    }

    #[test]
    fn test_store_error_conversion() {
        assert!(matches!(
            AuthError::from(StoreError::DuplicateKey),
            AuthError::AlreadyRegistered
        ));
        assert!(matches!(
            AuthError::from(StoreError::NotFound),
            AuthError::NotFound
        ));
    }
}

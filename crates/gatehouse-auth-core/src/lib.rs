//! Gatehouse Auth Core - Authentication business logic
//!
//! One parameterized auth core serving every role namespace: account
//! registration, credential verification, token issuance, refresh-token
//! rotation, and session revocation.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod password;
pub mod service;
pub mod session;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use fingerprint::{fingerprint, fingerprint_matches};
pub use password::PasswordVerifier;
pub use service::AuthService;
pub use session::SessionManager;
pub use token::{TokenClaims, TokenCodec, TokenKind};

//! Password hashing with Argon2id
//!
//! Hashing is self-salting: the same plaintext hashed twice yields
//! different credentials, and both verify.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, SaltString},
    Algorithm, Argon2, Params, PasswordVerifier as _, Version,
};

use crate::AuthError;

/// Password hasher and verifier.
///
/// Uses OWASP-recommended Argon2id parameters:
/// - Memory: 19456 KiB (19 MiB)
/// - Iterations: 2
/// - Parallelism: 1
#[derive(Debug, Clone)]
pub struct PasswordVerifier {
    params: Params,
}

impl Default for PasswordVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordVerifier {
    /// Create a password verifier with OWASP-recommended parameters
    pub fn new() -> Self {
        // m=19456 (19 MiB), t=2, p=1. These are hardcoded constants that
        // are always valid; failure indicates a bug in the argon2 crate,
        // not a runtime condition.
        let params = Params::new(19456, 2, 1, None).expect("OWASP Argon2 parameters are valid");
        Self { params }
    }

    /// Create a password verifier with custom parameters.
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` if parameters are invalid.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Configuration(format!("invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password into a PHC-formatted credential.
    ///
    /// # Errors
    /// Returns `AuthError::Internal` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored credential.
    ///
    /// Never fails: a malformed credential, like a wrong password,
    /// yields `false`.
    pub fn verify(&self, password: &str, credential: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(credential) else {
            tracing::debug!("Stored credential is not a valid PHC string");
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

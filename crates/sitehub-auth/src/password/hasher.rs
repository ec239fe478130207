//! Credential hashing.

use argon2::{
    Argon2,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier,
        SaltString, rand_core::OsRng,
    },
};

use sitehub_core::error::AppError;

/// Argon2id password hashing with per-password random salts.
///
/// Verification distinguishes a wrong password (`Ok(false)`) from a
/// hash that cannot be parsed at all (`Err`), since the latter means
/// corrupted stored data rather than bad input.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password. Each call salts independently, so
    /// equal passwords produce distinct hashes.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Stored password hash is invalid: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

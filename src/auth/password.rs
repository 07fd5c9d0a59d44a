//! Password hashing
//!
//! One-way bcrypt hashing for credential storage.

use crate::error::Result;

/// One-way password hashing capability.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, plain_password: &str) -> Result<String>;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, plain_password: &str, password_hash: &str) -> Result<bool>;
}

/// bcrypt implementation using the library default cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptPasswordHasher;

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<String> {
        Ok(bcrypt::hash(plain_password, bcrypt::DEFAULT_COST)?)
    }

    fn verify(&self, plain_password: &str, password_hash: &str) -> Result<bool> {
        Ok(bcrypt::verify(plain_password, password_hash)?)
    }
}

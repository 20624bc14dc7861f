//! Driven port for password hashing.

use async_trait::async_trait;

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed or the blocking worker was lost.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Hashes and checks account passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Derive a salted digest for `password`.
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError>;

    /// Check `password` against `digest`; a mismatch is `Ok(false)`.
    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError>;
}

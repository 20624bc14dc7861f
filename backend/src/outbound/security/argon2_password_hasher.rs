//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is CPU-bound and deliberately slow, so both operations run on the
//! blocking thread pool instead of an actix worker.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Password hasher using Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

fn join_error(error: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing worker failed: {error}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| PasswordDigest::new(hash.to_string()))
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        })
        .await
        .map_err(join_error)?
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let encoded = digest.as_str().to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&encoded)
                .map_err(|err| PasswordHashError::malformed_digest(err.to_string()))?;
            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(err) => Err(PasswordHashError::hash(err.to_string())),
            }
        })
        .await
        .map_err(join_error)?
    }
}

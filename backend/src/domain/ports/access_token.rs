//! Driven ports for issuing and checking bearer access tokens.
//!
//! Issuing and verifying are split so the HTTP extractor only depends on the
//! verifier.

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or accepted.
    pub enum AccessTokenError {
        /// The token does not have the expected shape.
        Malformed => "access token is malformed",
        /// The signature does not match the payload.
        BadSignature => "access token signature mismatch",
        /// The token lifetime has elapsed.
        Expired => "access token has expired",
        /// Signing failed.
        Issue { message: String } => "access token could not be issued: {message}",
    }
}

/// Issues bearer tokens for authenticated users.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenIssuer: Send + Sync {
    /// Sign a token identifying `user`.
    fn issue(&self, user: &UserId) -> Result<AccessToken, AccessTokenError>;
}

/// Resolves presented bearer tokens back to a user.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenVerifier: Send + Sync {
    /// Check a presented token and return the user it identifies.
    fn verify(&self, token: &str) -> Result<UserId, AccessTokenError>;
}

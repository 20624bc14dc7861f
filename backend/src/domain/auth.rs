//! Authentication primitives: login credentials, password digests and
//! bearer access tokens.
//!
//! Inbound adapters validate raw strings through these constructors before
//! calling [`crate::domain::ports::LoginService`].

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{UserValidationError, Username};

/// Maximum accepted password length in bytes.
pub const PASSWORD_MAX_BYTES: usize = 1024;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error(transparent)]
    Username(#[from] UserValidationError),
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at most {max} bytes")]
    PasswordTooLong { max: usize },
}

impl LoginValidationError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            Self::EmptyPassword | Self::PasswordTooLong { .. } => "password",
        }
    }
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` satisfies [`Username`]'s rules.
/// - `password` is non-empty and keeps caller-provided whitespace; its buffer
///   is zeroed on drop.
///
/// # Examples
/// ```
/// use taskdeck::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "hunter22").unwrap();
/// assert_eq!(creds.username().as_ref(), "ada");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(LoginValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Encoded password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an encoded digest produced by a [`crate::domain::ports::PasswordHasher`].
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Signed bearer token handed to clients after login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Build a token from its wire form and expiry instant.
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: Zeroizing::new(value.into()),
            expires_at,
        }
    }

    /// Wire form sent in the `Authorization: Bearer` header.
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Instant after which the token is rejected.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

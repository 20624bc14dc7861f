//! Credential adapters: password hashing and access-token signing.

mod argon2_password_hasher;
mod hmac_token_authority;
mod token_secret;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use hmac_token_authority::{DEFAULT_TOKEN_TTL_HOURS, HmacTokenAuthority};
pub use token_secret::{
    BuildMode, TOKEN_SECRET_MIN_LEN, TokenSecret, TokenSecretError, load_token_secret,
};

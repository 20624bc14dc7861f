//! Loading of the access-token signing secret.
//!
//! Release builds require a secret file of at least [`TOKEN_SECRET_MIN_LEN`]
//! bytes. Debug builds, or deployments that opt in explicitly, fall back to a
//! random per-process secret; tokens then stop validating after a restart.

use std::fmt;
use std::path::{Path, PathBuf};

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;
use zeroize::Zeroizing;

/// Minimum accepted secret length in bytes.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret file.
    Debug,
    /// Release builds require the secret file unless ephemeral secrets are
    /// explicitly allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while loading the signing secret.
#[derive(Debug, thiserror::Error)]
pub enum TokenSecretError {
    #[error("failed to read token secret at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// HMAC signing key material, zeroed on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap raw key bytes. Returns `None` when shorter than
    /// [`TOKEN_SECRET_MIN_LEN`].
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        let bytes = Zeroizing::new(bytes);
        (bytes.len() >= TOKEN_SECRET_MIN_LEN).then_some(Self(bytes))
    }

    /// Generate a random secret for this process only.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

fn read_secret_file(path: &Path) -> std::io::Result<Zeroizing<Vec<u8>>> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name).map(Zeroizing::new)
}

/// Load the signing secret from `path`.
///
/// # Examples
/// ```
/// use taskdeck::outbound::security::{BuildMode, load_token_secret};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("token_secret");
/// taskdeck::test_support::cap_fs::write_file(&path, &[b'k'; 48])?;
///
/// let secret = load_token_secret(&path, BuildMode::Release, false)?;
/// # let _ = secret;
/// # Ok(())
/// # }
/// ```
pub fn load_token_secret(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<TokenSecret, TokenSecretError> {
    match read_secret_file(path) {
        Ok(bytes) => {
            let length = bytes.len();
            TokenSecret::from_bytes(bytes.to_vec()).ok_or_else(|| TokenSecretError::TooShort {
                path: path.to_path_buf(),
                length,
                min_len: TOKEN_SECRET_MIN_LEN,
            })
        }
        Err(error) => {
            if mode == BuildMode::Debug || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using ephemeral token secret; tokens will not survive a restart"
                );
                Ok(TokenSecret::generate())
            } else {
                Err(TokenSecretError::Read {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}

//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username must not contain whitespace or control characters")]
    UsernameInvalidCharacters,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    ///
    /// # Examples
    /// ```
    /// use taskdeck::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique login name.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`USERNAME_MAX`] characters.
/// - Contains no whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Default theme for new accounts.
pub const DEFAULT_THEME: &str = "light";
/// Default task view for new accounts.
pub const DEFAULT_VIEW: &str = "list";

/// Display preferences stored with the account.
///
/// The backend treats both values as opaque strings; only clients interpret
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: String,
    pub default_view: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            default_view: DEFAULT_VIEW.to_owned(),
        }
    }
}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_view: Option<String>,
}

impl UserSettings {
    /// Apply a partial update, returning the merged settings.
    ///
    /// # Examples
    /// ```
    /// use taskdeck::domain::{UserSettings, UserSettingsPatch};
    ///
    /// let merged = UserSettings::default().merged(UserSettingsPatch {
    ///     theme: Some("dark".into()),
    ///     default_view: None,
    /// });
    /// assert_eq!(merged.theme, "dark");
    /// assert_eq!(merged.default_view, "list");
    /// ```
    #[must_use]
    pub fn merged(self, patch: UserSettingsPatch) -> Self {
        Self {
            theme: patch.theme.unwrap_or(self.theme),
            default_view: patch.default_view.unwrap_or(self.default_view),
        }
    }
}

/// Application user.
///
/// The password digest is deliberately absent: it only travels between the
/// account service and the user repository via
/// [`crate::domain::ports::StoredCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    settings: UserSettings,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, username: Username, settings: UserSettings) -> Self {
        Self {
            id,
            username,
            settings,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display preferences.
    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }
}

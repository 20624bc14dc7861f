//! Driving port for display-preference updates.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserSettings, UserSettingsPatch};

/// Domain use-case port for changing display settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSettingsCommand: Send + Sync {
    /// Merge `patch` into the user's settings and return the stored result.
    async fn update_settings(
        &self,
        user_id: &UserId,
        patch: UserSettingsPatch,
    ) -> Result<UserSettings, Error>;
}

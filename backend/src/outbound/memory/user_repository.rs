//! In-memory account store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserSettings, Username};

#[derive(Debug, Default)]
struct Accounts {
    by_id: HashMap<UserId, StoredCredentials>,
    by_username: HashMap<Username, UserId>,
}

/// Account store keyed by id with a unique username index.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<Accounts>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut accounts = self.accounts.write().await;
        if accounts.by_username.contains_key(&record.username) {
            return Err(UserPersistenceError::duplicate_username(
                record.username.as_ref(),
            ));
        }
        let user = User::new(record.id, record.username.clone(), record.settings.clone());
        accounts
            .by_username
            .insert(record.username.clone(), record.id);
        accounts.by_id.insert(
            record.id,
            StoredCredentials {
                user: user.clone(),
                password: record.password.clone(),
            },
        );
        Ok(user)
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .by_username
            .get(username)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.by_id.get(id).map(|stored| stored.user.clone()))
    }

    async fn update_settings(
        &self,
        id: &UserId,
        settings: &UserSettings,
    ) -> Result<Option<UserSettings>, UserPersistenceError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.by_id.get_mut(id).map(|stored| {
            stored.user = User::new(
                *stored.user.id(),
                stored.user.username().clone(),
                settings.clone(),
            );
            settings.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordDigest;
    use rstest::rstest;

    fn record(username: &str) -> NewUserRecord {
        NewUserRecord {
            id: UserId::random(),
            username: Username::new(username).expect("valid username"),
            password: PasswordDigest::new("digest"),
            settings: UserSettings::default(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let repo = InMemoryUserRepository::default();
        repo.create(&record("ada")).await.expect("first insert");
        let err = repo.create(&record("ada")).await.expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate_username("ada"));
    }

    #[rstest]
    #[tokio::test]
    async fn credentials_are_found_by_username() {
        let repo = InMemoryUserRepository::default();
        let rec = record("grace");
        repo.create(&rec).await.expect("insert");

        let stored = repo
            .find_credentials(&rec.username)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.user.id(), &rec.id);
        assert_eq!(stored.password, rec.password);
        assert!(
            repo.find_credentials(&Username::new("nobody").expect("valid"))
                .await
                .expect("lookup")
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn settings_updates_are_visible_on_next_lookup() {
        let repo = InMemoryUserRepository::default();
        let rec = record("linus");
        repo.create(&rec).await.expect("insert");
        let dark = UserSettings {
            theme: "dark".to_owned(),
            default_view: "board".to_owned(),
        };

        let stored = repo
            .update_settings(&rec.id, &dark)
            .await
            .expect("update");
        assert_eq!(stored, Some(dark.clone()));
        let user = repo
            .find_by_id(&rec.id)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(user.settings(), &dark);
        assert!(
            repo.update_settings(&UserId::random(), &dark)
                .await
                .expect("update")
                .is_none()
        );
    }
}

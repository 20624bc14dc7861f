//! Tests for the account service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockAccessTokenIssuer, MockPasswordHasher, MockUserRepository, StoredCredentials,
};
use crate::domain::{AccessToken, ErrorCode, PasswordDigest, Username};

type Service = AccountService<MockUserRepository, MockPasswordHasher>;

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockAccessTokenIssuer,
) -> Service {
    AccountService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("ada", "correct horse").expect("valid credentials")
}

fn stored_user() -> StoredCredentials {
    StoredCredentials {
        user: User::new(
            UserId::random(),
            Username::new("ada").expect("valid username"),
            UserSettings::default(),
        ),
        password: PasswordDigest::new("digest"),
    }
}

#[tokio::test]
async fn register_hashes_password_and_applies_default_settings() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "correct horse")
        .times(1)
        .returning(|_| Ok(PasswordDigest::new("digest")));
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|record| {
            record.password == PasswordDigest::new("digest")
                && record.settings == UserSettings::default()
                && record.username.as_ref() == "ada"
        })
        .times(1)
        .returning(|record| {
            Ok(User::new(
                record.id,
                record.username.clone(),
                record.settings.clone(),
            ))
        });

    let service = make_service(users, hasher, MockAccessTokenIssuer::new());
    let user = service.register(&credentials()).await.expect("registers");
    assert_eq!(user.username().as_ref(), "ada");
}

#[tokio::test]
async fn register_reports_duplicate_username_as_conflict() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordDigest::new("digest")));
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .returning(|_| Err(UserPersistenceError::duplicate_username("ada")));

    let service = make_service(users, hasher, MockAccessTokenIssuer::new());
    let err = service.register(&credentials()).await.expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("field")).and_then(|v| v.as_str()),
        Some("username")
    );
}

#[tokio::test]
async fn login_issues_token_and_returns_settings() {
    let stored = stored_user();
    let user_id = *stored.user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(1).returning(|_, _| Ok(true));
    let mut tokens = MockAccessTokenIssuer::new();
    tokens
        .expect_issue()
        .withf(move |id| *id == user_id)
        .times(1)
        .returning(|_| Ok(AccessToken::new("signed", Utc::now())));

    let service = make_service(users, hasher, tokens);
    let outcome = service.login(&credentials()).await.expect("login succeeds");
    assert_eq!(outcome.user_id, user_id);
    assert_eq!(outcome.token.as_str(), "signed");
    assert_eq!(outcome.settings, UserSettings::default());
}

#[rstest]
#[case(false, true)]
#[case(true, false)]
#[tokio::test]
async fn login_rejects_unknown_user_or_wrong_password(
    #[case] user_exists: bool,
    #[case] password_matches: bool,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials()
        .return_once(move |_| Ok(user_exists.then(stored_user)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .returning(move |_, _| Ok(password_matches));
    let mut tokens = MockAccessTokenIssuer::new();
    tokens.expect_issue().never();

    let service = make_service(users, hasher, tokens);
    let err = service.login(&credentials()).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[tokio::test]
async fn update_settings_merges_patch_over_current_values() {
    let stored = stored_user();
    let user = stored.user.clone();
    let user_id = *user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(user)));
    users
        .expect_update_settings()
        .withf(|_, settings| settings.theme == "dark" && settings.default_view == "list")
        .times(1)
        .returning(|_, settings| Ok(Some(settings.clone())));

    let service = make_service(users, MockPasswordHasher::new(), MockAccessTokenIssuer::new());
    let settings = service
        .update_settings(
            &user_id,
            UserSettingsPatch {
                theme: Some("dark".to_owned()),
                default_view: None,
            },
        )
        .await
        .expect("update succeeds");
    assert_eq!(settings.theme, "dark");
}

#[tokio::test]
async fn update_settings_for_missing_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let service = make_service(users, MockPasswordHasher::new(), MockAccessTokenIssuer::new());
    let err = service
        .update_settings(&UserId::random(), UserSettingsPatch::default())
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;

use crate::domain::UserId;
use crate::domain::ports::{
    AccessTokenError, MockAccessTokenVerifier, MockLoginService, MockTaskCommand, MockTaskQuery,
    MockUserSettingsCommand,
};

use super::state::{HttpState, HttpStatePorts};

/// Token accepted by [`accepting_verifier`].
pub const TEST_TOKEN: &str = "test-token";

/// Driving ports backed by mocks with no expectations set.
pub fn stub_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(MockLoginService::new()),
        settings: Arc::new(MockUserSettingsCommand::new()),
        tasks: Arc::new(MockTaskCommand::new()),
        tasks_query: Arc::new(MockTaskQuery::new()),
    }
}

pub fn state_with(ports: HttpStatePorts, verifier: MockAccessTokenVerifier) -> HttpState {
    HttpState::new(ports, Arc::new(verifier))
}

/// Verifier resolving [`TEST_TOKEN`] to `user` and rejecting anything else.
pub fn accepting_verifier(user: UserId) -> MockAccessTokenVerifier {
    let mut verifier = MockAccessTokenVerifier::new();
    verifier.expect_verify().returning(move |token| {
        if token == TEST_TOKEN {
            Ok(user)
        } else {
            Err(AccessTokenError::bad_signature())
        }
    });
    verifier
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer_header() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

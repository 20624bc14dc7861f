//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take a [`BearerIdentity`] argument; the extractor rejects the
//! request with `401 Unauthorized` before the handler body runs whenever the
//! `Authorization` header is missing, malformed, or carries a token the
//! configured [`AccessTokenVerifier`](crate::domain::ports::AccessTokenVerifier)
//! refuses.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::debug;

use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, proven by a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerIdentity(UserId);

impl BearerIdentity {
    /// Authenticated user id.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    /// Consume the identity, yielding the user id.
    pub fn into_user_id(self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<BearerIdentity, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized("bearer token required"))?;
    state.tokens.verify(token).map(BearerIdentity).map_err(|err| {
        debug!(error = %err, "rejected bearer token");
        Error::unauthorized("invalid or expired token")
    })
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::AccessTokenError;
    use crate::inbound::http::test_utils::{state_with, stub_ports};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn call(header: Option<&str>) -> (StatusCode, String) {
        let mut verifier = crate::domain::ports::MockAccessTokenVerifier::new();
        verifier.expect_verify().returning(|token| {
            if token == "good" {
                UserId::new(USER).map_err(|_| AccessTokenError::malformed())
            } else {
                Err(AccessTokenError::bad_signature())
            }
        });
        let state = state_with(stub_ports(), verifier);
        let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
            "/whoami",
            web::get().to(|identity: BearerIdentity| async move {
                HttpResponse::Ok().body(identity.user_id().to_string())
            }),
        ))
        .await;

        let mut request = test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn valid_token_yields_identity() {
        let (status, body) = call(Some("Bearer good")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, USER);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer "))]
    #[case(Some("Basic Z29vZA=="))]
    #[case(Some("Bearer forged"))]
    #[actix_web::test]
    async fn missing_or_invalid_tokens_are_unauthorised(#[case] header: Option<&str>) {
        let (status, body) = call(header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"code\":\"unauthorized\""));
    }
}

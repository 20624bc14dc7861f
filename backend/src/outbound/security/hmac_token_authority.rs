//! HMAC-SHA256 signed bearer tokens.
//!
//! Wire form: `<user-uuid>.<expiry-unix-seconds>.<hex signature>`, where the
//! signature covers `<user-uuid>.<expiry-unix-seconds>`. Tokens are stateless;
//! rotating the secret invalidates every outstanding token.

use std::sync::Arc;

use chrono::{DateTime, Duration};
use hmac::{Hmac, Mac};
use mockable::Clock;
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::ports::{AccessTokenError, AccessTokenIssuer, AccessTokenVerifier};
use crate::domain::{AccessToken, UserId};

use super::TokenSecret;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Issues and verifies HMAC-signed access tokens.
#[derive(Clone)]
pub struct HmacTokenAuthority {
    secret: TokenSecret,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl HmacTokenAuthority {
    /// Tokens signed with `secret` stay valid for `ttl` after issue.
    pub fn new(secret: TokenSecret, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { secret, ttl, clock }
    }

    fn mac(&self) -> Result<HmacSha256, AccessTokenError> {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|err| AccessTokenError::issue(err.to_string()))
    }

    fn sign(&self, payload: &str) -> Result<String, AccessTokenError> {
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl AccessTokenIssuer for HmacTokenAuthority {
    fn issue(&self, user: &UserId) -> Result<AccessToken, AccessTokenError> {
        let expires_at = self.clock.utc() + self.ttl;
        let payload = format!("{}.{}", user.as_uuid(), expires_at.timestamp());
        let signature = self.sign(&payload)?;
        let expires_at = DateTime::from_timestamp(expires_at.timestamp(), 0)
            .ok_or_else(|| AccessTokenError::issue("expiry out of range"))?;
        Ok(AccessToken::new(format!("{payload}.{signature}"), expires_at))
    }
}

impl AccessTokenVerifier for HmacTokenAuthority {
    fn verify(&self, token: &str) -> Result<UserId, AccessTokenError> {
        let (payload, signature) = token
            .trim()
            .rsplit_once('.')
            .ok_or_else(AccessTokenError::malformed)?;
        let (user, expiry) = payload
            .split_once('.')
            .ok_or_else(AccessTokenError::malformed)?;
        let user = Uuid::parse_str(user).map_err(|_| AccessTokenError::malformed())?;
        let expiry: i64 = expiry.parse().map_err(|_| AccessTokenError::malformed())?;
        let signature = hex::decode(signature).map_err(|_| AccessTokenError::malformed())?;

        // The signature covers the bytes as received, so only the issuer's
        // exact encoding of the payload verifies.
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AccessTokenError::bad_signature())?;

        if self.clock.utc().timestamp() >= expiry {
            return Err(AccessTokenError::expired());
        }
        Ok(UserId::from_uuid(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::clock::MutableClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::at_epoch_of_tests())
    }

    fn authority(clock: Arc<MutableClock>, secret_byte: u8) -> HmacTokenAuthority {
        let secret = TokenSecret::from_bytes(vec![secret_byte; 32]).expect("secret");
        HmacTokenAuthority::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS), clock)
    }

    #[rstest]
    fn issued_tokens_verify_to_the_same_user(clock: Arc<MutableClock>) {
        let authority = authority(clock.clone(), b'a');
        let user = UserId::random();
        let token = authority.issue(&user).expect("issue");

        assert_eq!(authority.verify(token.as_str()).expect("verify"), user);
        assert_eq!(token.expires_at(), clock.utc() + Duration::hours(24));
    }

    #[rstest]
    fn tokens_expire_after_ttl(clock: Arc<MutableClock>) {
        let authority = authority(clock.clone(), b'a');
        let token = authority.issue(&UserId::random()).expect("issue");

        clock.advance(Duration::hours(24));
        assert_eq!(
            authority.verify(token.as_str()),
            Err(AccessTokenError::Expired)
        );
    }

    #[rstest]
    fn tokens_from_another_secret_are_rejected(clock: Arc<MutableClock>) {
        let token = authority(clock.clone(), b'a')
            .issue(&UserId::random())
            .expect("issue");
        assert_eq!(
            authority(clock, b'b').verify(token.as_str()),
            Err(AccessTokenError::BadSignature)
        );
    }

    #[rstest]
    fn tampered_user_is_rejected(clock: Arc<MutableClock>) {
        let authority = authority(clock, b'a');
        let token = authority.issue(&UserId::random()).expect("issue");
        let (_, rest) = token.as_str().split_once('.').expect("dotted token");
        let forged = format!("{}.{rest}", UserId::random());
        assert_eq!(
            authority.verify(&forged),
            Err(AccessTokenError::BadSignature)
        );
    }

    #[rstest]
    #[case::uppercase(str::to_uppercase)]
    #[case::simple(|id: &str| id.replace('-', ""))]
    #[case::braced(|id: &str| format!("{{{id}}}"))]
    fn alternative_uuid_encodings_are_rejected(
        clock: Arc<MutableClock>,
        #[case] reencode: fn(&str) -> String,
    ) {
        let authority = authority(clock, b'a');
        let token = authority.issue(&UserId::random()).expect("issue");
        let (user, rest) = token.as_str().split_once('.').expect("dotted token");
        let variant = format!("{}.{rest}", reencode(user));
        assert_eq!(
            authority.verify(&variant),
            Err(AccessTokenError::BadSignature)
        );
    }

    #[rstest]
    #[case("")]
    #[case("garbage")]
    #[case("not-a-uuid.123.abcd")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6.soon.abcd")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6.123.zz")]
    fn malformed_tokens_are_rejected(clock: Arc<MutableClock>, #[case] token: &str) {
        assert_eq!(
            authority(clock, b'a').verify(token),
            Err(AccessTokenError::Malformed)
        );
    }
}

//! Bearer-token authentication for the HTTP surface.
//!
//! Tokens are HS256 JWTs carrying the session identity. Claim-time
//! validation is separated from signature verification so it can be tested
//! deterministically.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use teamspace_core::UserId;

/// Claims carried by an API bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Email of the authenticated user, used as the session email.
    pub email: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or has a bad signature")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window.
pub fn validate_claims(claims: &ApiClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}

/// HS256 token verifier.
pub struct Hs256TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256TokenValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry lives in the `expires_at` claim and is checked by
        // `validate_claims`, not by the decoder's numeric `exp` handling.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify the signature and the claim time window.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<ApiClaims, TokenError> {
        let data = jsonwebtoken::decode::<ApiClaims>(token, &self.key, &self.validation)
            .map_err(|_| TokenError::Malformed)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;

    fn claims(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> ApiClaims {
        ApiClaims {
            sub: UserId::new(),
            email: "user@example.com".to_string(),
            issued_at,
            expires_at,
        }
    }

    fn encode(claims: &ApiClaims, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn valid_window_passes() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn expired_and_not_yet_valid_are_rejected() {
        let now = Utc::now();
        let expired = claims(now - Duration::minutes(20), now - Duration::minutes(10));
        assert_eq!(validate_claims(&expired, now), Err(TokenError::Expired));

        let future = claims(now + Duration::minutes(5), now + Duration::minutes(15));
        assert_eq!(validate_claims(&future, now), Err(TokenError::NotYetValid));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let c = claims(now, now - Duration::minutes(1));
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenError::InvalidTimeWindow)
        );
    }

    #[test]
    fn round_trip_through_the_validator() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        let token = encode(&c, b"secret");

        let validator = Hs256TokenValidator::new(b"secret");
        assert_eq!(validator.validate(&token, now), Ok(c));
    }

    #[test]
    fn wrong_secret_is_malformed() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        let token = encode(&c, b"secret");

        let validator = Hs256TokenValidator::new(b"other-secret");
        assert_eq!(
            validator.validate(&token, now),
            Err(TokenError::Malformed)
        );
    }
}

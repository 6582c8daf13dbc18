//! Token signing and verification.

use chrono::{DateTime, Duration, Utc};
use common::UserId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long issued tokens stay valid.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Authentication failures, split so expired tokens can be reported
/// distinctly from malformed or tampered ones.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingCredentials,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by every token. The wire shape is fixed; services on
/// both sides of a request agree on these field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.user_id)
    }
}

/// Issues tokens. Services themselves only verify; signing is used by
/// whatever fronts login, by operator tooling and by tests.
#[derive(Clone)]
pub struct TokenSigner {
    key: EncodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token expiring [`TOKEN_TTL_DAYS`] from now.
    pub fn issue(&self, user_id: UserId, email: &str) -> Result<String, AuthError> {
        self.issue_with_expiry(user_id, email, Utc::now() + Duration::days(TOKEN_TTL_DAYS))
    }

    /// Issues a token with an explicit expiry instant.
    pub fn issue_with_expiry(
        &self,
        user_id: UserId,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: user_id.as_i64(),
            email: email.to_owned(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::default(), &claims, &self.key).map_err(AuthError::Signing)
    }
}

/// Verifies tokens against the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            // HS256 with expiry checking, the jsonwebtoken defaults.
            validation: Validation::default(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_verifies() {
        let signer = TokenSigner::new(SECRET);
        let verifier = TokenVerifier::new(SECRET);

        let token = signer.issue(UserId::new(42), "maya@example.com").unwrap();
        let claims = verifier.verify(&token).unwrap();

        assert_eq!(claims.user_id(), UserId::new(42));
        assert_eq!(claims.email, "maya@example.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let signer = TokenSigner::new(SECRET);
        let verifier = TokenVerifier::new(SECRET);

        let token = signer
            .issue_with_expiry(
                UserId::new(1),
                "old@example.com",
                Utc::now() - Duration::hours(1),
            )
            .unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let signer = TokenSigner::new("other-secret");
        let verifier = TokenVerifier::new(SECRET);

        let token = signer.issue(UserId::new(1), "x@example.com").unwrap();

        assert!(matches!(verifier.verify(&token), Err(AuthError::Invalid)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify("not.a.token"),
            Err(AuthError::Invalid)
        ));
    }
}

//! Request extractor for authenticated callers.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};
use common::UserId;

use crate::token::{AuthError, Claims, TokenVerifier};

/// Forwards extraction through `Arc`-wrapped state. Services keep their
/// routers' state as `Arc<AppState>`; the orphan rule stops them from
/// implementing `FromRef<Arc<AppState>>` for a foreign `TokenVerifier`,
/// so this crate bridges the `Arc` and they implement `FromRef` for the
/// unwrapped state type instead.
impl<T> FromRef<Arc<T>> for TokenVerifier
where
    TokenVerifier: FromRef<T>,
{
    fn from_ref(state: &Arc<T>) -> Self {
        <TokenVerifier as FromRef<T>>::from_ref(state)
    }
}

/// The verified caller of a request, plus the raw bearer token so the
/// handler can forward the same identity to another service.
#[derive(Debug, Clone)]
pub struct AuthUser {
    claims: Claims,
    token: String,
}

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        self.claims.user_id()
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }

    /// The token exactly as presented, without the `Bearer ` prefix.
    pub fn bearer(&self) -> &str {
        &self.token
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenVerifier: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = TokenVerifier::from_ref(state);
        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingCredentials)?;
        let claims = verifier.verify(token)?;
        Ok(Self {
            claims,
            token: token.to_owned(),
        })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingCredentials | AuthError::Expired | AuthError::Invalid => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Signing(err) => {
                tracing::error!(error = %err, "token signing failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

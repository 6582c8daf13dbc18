//! Bearer-token authentication shared by every service.
//!
//! Tokens are HS256 JWTs signed with a secret common to all services,
//! carrying the user id and email with a seven-day expiry. Services
//! verify tokens locally; nothing calls back to an identity provider.
//! The [`AuthUser`] extractor keeps the raw token around so handlers
//! can forward the caller's identity on cross-service requests.

pub mod extract;
pub mod token;

pub use extract::AuthUser;
pub use token::{AuthError, Claims, TOKEN_TTL_DAYS, TokenSigner, TokenVerifier};

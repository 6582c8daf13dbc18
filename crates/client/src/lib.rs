//! HTTP clients for calls between the checkout services.
//!
//! Each collaborator is a trait with two implementations: an HTTP one
//! for production and an in-memory double that records calls and can
//! be told to fail. Callers decide what a failure means; nothing in
//! this crate retries.

pub mod cart;
pub mod error;
pub mod http;
pub mod order;

pub use cart::{CartClient, HttpCartClient, InMemoryCartClient};
pub use error::ClientError;
pub use http::{HttpClientConfig, build_http_client};
pub use order::{HttpOrderClient, InMemoryOrderClient, OrderClient, PaymentStatusPush};

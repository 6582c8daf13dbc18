//! Cart service client: snapshot fetch and clear.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::CartSnapshot;
use reqwest::StatusCode;

use crate::error::ClientError;
use crate::http::{join_url, ok_status};

/// Operations checkout and settlement need from the cart service.
#[async_trait]
pub trait CartClient: Send + Sync {
    /// Fetches the caller's priced cart snapshot.
    async fn fetch_cart(&self, bearer: &str) -> Result<CartSnapshot, ClientError>;

    /// Empties the caller's cart.
    async fn clear_cart(&self, bearer: &str) -> Result<(), ClientError>;
}

/// HTTP implementation, forwarding the caller's own bearer token so
/// the cart service sees the original user.
#[derive(Debug, Clone)]
pub struct HttpCartClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCartClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CartClient for HttpCartClient {
    async fn fetch_cart(&self, bearer: &str) -> Result<CartSnapshot, ClientError> {
        let response = self
            .client
            .get(join_url(&self.base_url, "/cart"))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        ok_status(response)?
            .json::<CartSnapshot>()
            .await
            .map_err(ClientError::Decode)
    }

    async fn clear_cart(&self, bearer: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(join_url(&self.base_url, "/cart"))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        ok_status(response).map(|_| ())
    }
}

#[derive(Debug)]
struct InMemoryCartState {
    snapshot: CartSnapshot,
    fail_on_fetch: bool,
    fail_on_clear: bool,
    fetch_calls: u32,
    clear_calls: u32,
    last_bearer: Option<String>,
}

impl Default for InMemoryCartState {
    fn default() -> Self {
        Self {
            snapshot: CartSnapshot::empty(),
            fail_on_fetch: false,
            fail_on_clear: false,
            fetch_calls: 0,
            clear_calls: 0,
            last_bearer: None,
        }
    }
}

/// In-memory cart client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartClient {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the snapshot returned by subsequent fetches.
    pub fn set_snapshot(&self, snapshot: CartSnapshot) {
        self.state.write().unwrap().snapshot = snapshot;
    }

    /// Configures fetch calls to fail.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Configures clear calls to fail.
    pub fn set_fail_on_clear(&self, fail: bool) {
        self.state.write().unwrap().fail_on_clear = fail;
    }

    pub fn fetch_calls(&self) -> u32 {
        self.state.read().unwrap().fetch_calls
    }

    pub fn clear_calls(&self) -> u32 {
        self.state.read().unwrap().clear_calls
    }

    /// The bearer token presented on the most recent call.
    pub fn last_bearer(&self) -> Option<String> {
        self.state.read().unwrap().last_bearer.clone()
    }
}

#[async_trait]
impl CartClient for InMemoryCartClient {
    async fn fetch_cart(&self, bearer: &str) -> Result<CartSnapshot, ClientError> {
        let mut state = self.state.write().unwrap();
        state.fetch_calls += 1;
        state.last_bearer = Some(bearer.to_owned());

        if state.fail_on_fetch {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(state.snapshot.clone())
    }

    async fn clear_cart(&self, bearer: &str) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();
        state.clear_calls += 1;
        state.last_bearer = Some(bearer.to_owned());

        if state.fail_on_clear {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        state.snapshot = CartSnapshot::empty();
        Ok(())
    }
}

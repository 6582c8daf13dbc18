//! Product catalog client.
//!
//! The cart never stores product data; it resolves products on demand.
//! A lookup that fails for any reason (missing product, catalog down,
//! malformed body) resolves to `None` and the caller decides what that
//! means: a 404 when adding, a skipped line when pricing a snapshot.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The catalog fields the cart needs. The catalog serves a richer
/// document; extra fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

/// Read access to the product catalog.
#[async_trait]
pub trait ProductClient: Send + Sync {
    /// Resolves a product, or `None` when it does not exist or the
    /// catalog cannot be reached.
    async fn get(&self, product_id: ProductId) -> Option<Product>;
}

/// HTTP catalog client.
#[derive(Debug, Clone)]
pub struct HttpProductClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProductClient for HttpProductClient {
    async fn get(&self, product_id: ProductId) -> Option<Product> {
        let url = format!(
            "{}/products/{product_id}",
            self.base_url.trim_end_matches('/')
        );

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%product_id, error = %err, "product catalog unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(%product_id, status = %response.status(), "product not resolvable");
            return None;
        }

        match response.json::<Product>().await {
            Ok(product) => Some(product),
            Err(err) => {
                tracing::warn!(%product_id, error = %err, "malformed product document");
                None
            }
        }
    }
}

/// In-memory catalog for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductClient {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: Product) {
        self.products.write().unwrap().insert(product.id, product);
    }

    /// Makes the product unresolvable, as if deleted from the catalog.
    pub fn remove(&self, product_id: ProductId) {
        self.products.write().unwrap().remove(&product_id);
    }
}

#[async_trait]
impl ProductClient for InMemoryProductClient {
    async fn get(&self, product_id: ProductId) -> Option<Product> {
        self.products.read().unwrap().get(&product_id).cloned()
    }
}

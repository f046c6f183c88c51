//! Remote catalog and stock-availability client.
//!
//! The remote service owns inventory truth. Two endpoints are consumed:
//!
//! - `GET {base}/stock/{id}` - current purchasable quantity
//! - `GET {base}/products/{id}` - full descriptive product record
//!
//! Product records are immutable catalog data and are cached via `moka`
//! (5-minute TTL). Stock is never cached: it is the validation input
//! for every mutation and must be fresh.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use rocket_cart_core::{ProductId, ProductRecord, Stock};

use crate::config::CartConfig;

/// Maximum number of cached product records.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// How long a cached product record stays valid.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when talking to the remote service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    NotFound(ProductId),
}

/// Source of stock and product data for cart validation.
///
/// The store is generic over this trait so tests can inject fakes
/// instead of a live HTTP client.
pub trait Catalog {
    /// Current stock for a product, or `None` when the service has no
    /// stock record for the ID.
    fn stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Stock>, CatalogError>> + Send;

    /// Full descriptive record for a product.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<ProductRecord, CatalogError>> + Send;
}

/// HTTP client for the remote catalog/stock service.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: String,
    products: Cache<ProductId, ProductRecord>,
}

impl HttpCatalog {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CartConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(HttpCatalogInner {
                client,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                products,
            }),
        })
    }
}

impl Catalog for HttpCatalog {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Option<Stock>, CatalogError> {
        let url = format!("{}/stock/{id}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        // A missing stock record is a validation outcome, not a failure.
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let stock = response
            .json::<Stock>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        Ok(Some(stock))
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<ProductRecord, CatalogError> {
        // Check cache
        if let Some(record) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(record);
        }

        let url = format!("{}/products/{id}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let record = response
            .json::<ProductRecord>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        // Cache the result
        self.inner.products.insert(id, record.clone()).await;

        Ok(record)
    }
}

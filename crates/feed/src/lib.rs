//! Product feed supplier.
//!
//! Provides the `ProductSource` trait and its HTTP implementation. The core
//! engine never fetches anything itself; it consumes whatever `ProductRecord`
//! list a source hands it, already deduplicated and restricted to active
//! items by the supplier.

use distripet_model::ProductRecord;
use std::future::Future;
use thiserror::Error;

/// Errors from product feed operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Feed request failed: {0}")]
    FetchFailed(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Feed not available")]
    Unavailable,
}

/// Trait for product suppliers (HTTP feed, fixtures, future ERP export).
///
/// This abstraction keeps classification and navigation testable without a
/// running feed.
pub trait ProductSource {
    /// Fetch the current active product list.
    fn fetch_products(&self)
        -> impl Future<Output = Result<Vec<ProductRecord>, FeedError>> + Send;

    /// Check if the supplier is reachable.
    fn health_check(&self) -> impl Future<Output = Result<(), FeedError>> + Send;

    /// Supplier name for logging.
    fn name(&self) -> &'static str;
}

/// HTTP feed configuration.
#[derive(Debug, Clone)]
pub struct HttpFeedConfig {
    /// Base URL of the distribution feed
    pub base_url: String,
    /// Path of the product listing endpoint
    pub products_path: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpFeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9080".to_string(),
            products_path: "/api/products".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP product feed.
pub struct HttpFeed {
    config: HttpFeedConfig,
    client: reqwest::Client,
}

impl HttpFeed {
    /// Create a new HTTP feed client.
    pub fn new(config: HttpFeedConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn products_url(&self) -> String {
        format!("{}{}", self.config.base_url, self.config.products_path)
    }

    /// Parse the feed response into records.
    ///
    /// Accepts either a bare JSON array or a `{"products": [...]}` wrapper,
    /// and reads both the current field names and the legacy Spanish ones
    /// the feed exported for years. Rows without an id are skipped.
    fn parse_response(&self, response: serde_json::Value) -> Result<Vec<ProductRecord>, FeedError> {
        let rows = response
            .as_array()
            .or_else(|| response.get("products").and_then(|p| p.as_array()))
            .ok_or_else(|| FeedError::Parse("missing products array".to_string()))?;

        let mut records = Vec::new();

        for row in rows {
            let id = text_field(row, &["id", "codigo"]);
            if id.is_empty() {
                tracing::warn!(row = %row, "Skipping feed row without id");
                continue;
            }

            records.push(ProductRecord {
                id,
                name: text_field(row, &["name", "nombre"]),
                brand: text_field(row, &["brand", "marca"]),
                subcategory_signal: text_field(
                    row,
                    &["subcategory_signal", "categoria_especifica"],
                ),
                price: number_field(row, &["price", "precio"]),
                stock: number_field(row, &["stock"]) as u32,
            });
        }

        Ok(records)
    }
}

fn text_field(row: &serde_json::Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| row.get(key).and_then(|v| v.as_str()))
        .unwrap_or("")
        .to_string()
}

fn number_field(row: &serde_json::Value, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|key| row.get(key).and_then(|v| v.as_f64()))
        .unwrap_or(0.0)
}

impl ProductSource for HttpFeed {
    async fn fetch_products(&self) -> Result<Vec<ProductRecord>, FeedError> {
        let url = self.products_url();

        tracing::debug!(url = %url, "Fetching product feed");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::FetchFailed(format!("HTTP {}: {}", status, body)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        self.parse_response(json)
    }

    async fn health_check(&self) -> Result<(), FeedError> {
        let response = self
            .client
            .get(format!("{}/health", self.config.base_url))
            .send()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(FeedError::Unavailable)
        }
    }

    fn name(&self) -> &'static str {
        "http-feed"
    }
}

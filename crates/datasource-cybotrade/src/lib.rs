#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/datasource/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Cybotrade datasource provider.
//!
//! This crate implements the datasource-core traits for the Cybotrade
//! datasource REST API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use datasource_cybotrade::CybotradeProvider;
//! use datasource_core::{PaginatedDataProvider, PaginatedQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = CybotradeProvider::new("your_api_key");
//!
//!     let query = PaginatedQuery::new("bybit-linear|candle?symbol=BTCUSDT&interval=1m")
//!         .with_limit(10_000);
//!     let df = provider.query_paginated(&query).await?;
//!     println!("{df}");
//!
//!     Ok(())
//! }
//! ```

mod paging;
mod rows;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use datasource_core::{
    ApiKey, DataError, DataProvider, PaginatedDataProvider, PaginatedQuery, Result, Topic,
};
use polars::prelude::DataFrame;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::paging::{PageRequest, collect_pages};
use crate::rows::rows_to_frame;

/// Base URL for the Cybotrade datasource API.
pub const CYBOTRADE_BASE_URL: &str = "https://api.datasource.cybotrade.rs";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-API-KEY";

const PROVIDER_NAME: &str = "Cybotrade";

/// Cybotrade datasource provider.
///
/// Provides paginated access to every topic the datasource exposes:
/// - Exchange candles and trades (`bybit-linear|candle?...`)
/// - CryptoQuant on-chain and market metrics (`cryptoquant|btc/...`)
/// - Glassnode metrics (`glassnode|market/...`)
#[derive(Clone)]
pub struct CybotradeProvider {
    client: Client,
    api_key: ApiKey,
    base_url: String,
}

impl fmt::Debug for CybotradeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CybotradeProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CybotradeProvider {
    /// Create a new Cybotrade provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new Cybotrade provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<ApiKey>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: CYBOTRADE_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the API host this provider talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for one page of a topic.
    fn page_url(&self, endpoint: &TopicEndpoint<'_>, page: PageRequest) -> String {
        let mut params = format!("limit={}", page.limit);
        if let Some(start) = page.start_time {
            params.push_str(&format!("&start_time={start}"));
        }
        if let Some(end) = page.end_time {
            params.push_str(&format!("&end_time={end}"));
        }

        let url = format!("{}/{}/{}", self.base_url, endpoint.provider, endpoint.path);
        if url.contains('?') {
            format!("{url}&{params}")
        } else {
            format!("{url}?{params}")
        }
    }

    /// Fetch one page of rows.
    async fn fetch_page(
        &self,
        endpoint: &TopicEndpoint<'_>,
        page: PageRequest,
    ) -> Result<Vec<Value>> {
        let url = self.page_url(endpoint, page);
        debug!(topic = %endpoint.topic, start_time = ?page.start_time, "Cybotrade request");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after(response.headers());
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after, endpoint.topic, text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let envelope: PageEnvelope =
            serde_json::from_str(&text).map_err(|e| DataError::Parse(format!("{e}: {text}")))?;
        Ok(envelope.data)
    }
}

impl DataProvider for CybotradeProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Cybotrade datasource - exchange, on-chain and market metric time series"
    }
}

#[async_trait]
impl PaginatedDataProvider for CybotradeProvider {
    #[instrument(skip(self, query), fields(topic = %query.topic, limit = query.limit))]
    async fn query_paginated(&self, query: &PaginatedQuery) -> Result<DataFrame> {
        query.validate()?;
        let endpoint = TopicEndpoint::parse(&query.topic)?;

        let first = PageRequest {
            start_time: query.start_time.map(|t| t.timestamp_millis()),
            end_time: query.end_time.map(|t| t.timestamp_millis()),
            limit: query.limit,
        };
        let rows = collect_pages(first, |page| self.fetch_page(&endpoint, page)).await?;

        debug!(rows = rows.len(), "Topic fetched");
        rows_to_frame(&rows)
    }
}

/// A topic split into the provider segment and the path with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TopicEndpoint<'a> {
    topic: &'a Topic,
    provider: &'a str,
    path: &'a str,
}

impl<'a> TopicEndpoint<'a> {
    fn parse(topic: &'a Topic) -> Result<Self> {
        let (provider, path) = topic
            .as_str()
            .split_once('|')
            .ok_or_else(|| DataError::InvalidTopic(format!("{topic} (expected provider|path)")))?;

        let provider = provider.trim();
        let path = path.trim().trim_start_matches('/');
        if provider.is_empty() || path.is_empty() || path.starts_with('?') {
            return Err(DataError::InvalidTopic(format!(
                "{topic} (expected provider|path)"
            )));
        }

        Ok(Self {
            topic,
            provider,
            path,
        })
    }
}

/// Map a non-success HTTP status onto a [`DataError`].
fn status_error(
    status: StatusCode,
    retry_after: Option<Duration>,
    topic: &Topic,
    body: String,
) -> DataError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DataError::AuthenticationFailed(PROVIDER_NAME.to_string())
        }
        StatusCode::NOT_FOUND => DataError::TopicNotFound(topic.to_string()),
        StatusCode::TOO_MANY_REQUESTS => DataError::RateLimited {
            provider: PROVIDER_NAME.to_string(),
            retry_after,
        },
        _ => DataError::Network(format!("HTTP {status}: {body}")),
    }
}

/// Reads a `Retry-After` header given in seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// ============================================================================
// Cybotrade API Response Types
// ============================================================================

/// One page of a Cybotrade response.
#[derive(Debug, Clone, Deserialize)]
struct PageEnvelope {
    #[serde(default)]
    data: Vec<Value>,
}

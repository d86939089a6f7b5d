//! Provider traits for fetching topic data.
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`PaginatedDataProvider`] - Retrieve every record for a topic as one table

use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::fmt::Debug;

use crate::{error::Result, query::PaginatedQuery};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Cybotrade").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for paginated topic queries.
///
/// Implementations follow the provider's paging scheme internally and hand
/// back a single table holding every page in order.
#[async_trait]
pub trait PaginatedDataProvider: DataProvider {
    /// Fetches all records for the query's topic.
    ///
    /// Returns a DataFrame whose columns are defined by the provider. A topic
    /// with no records yields an empty frame, not an error.
    async fn query_paginated(&self, query: &PaginatedQuery) -> Result<DataFrame>;
}

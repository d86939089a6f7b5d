#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/datasource/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for topic-based market data providers.
//!
//! This crate provides the foundational abstractions used across the workspace:
//!
//! - [`DataProvider`](provider::DataProvider) - Base trait for all providers
//! - [`PaginatedDataProvider`](provider::PaginatedDataProvider) - Paginated topic queries
//! - [`Topic`](types::Topic) - Opaque topic identifier
//! - [`ApiKey`](credential::ApiKey) - Provider credential with redacted `Debug`

/// Provider credentials.
pub mod credential;
/// Error types for data operations.
pub mod error;
/// Provider traits for fetching topic data.
pub mod provider;
/// Query parameters for paginated requests.
pub mod query;
/// Core data types (Topic, TopicFrame).
pub mod types;

// Re-export commonly used items at crate root
pub use credential::ApiKey;
pub use error::{DataError, Result};
pub use provider::{DataProvider, PaginatedDataProvider};
pub use query::{DEFAULT_PAGE_LIMIT, PaginatedQuery};
pub use types::{Topic, TopicFrame};

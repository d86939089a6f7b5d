#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/datasource/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Concurrent topic fetching for market data providers.
//!
//! This crate re-exports the core types and provider implementations and
//! provides a [`FetchOrchestrator`] that queries many topics at once and
//! returns their tables in input order.
//!
//! # Features
//!
//! - `cybotrade` - Cybotrade datasource provider (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use datasource::{FetchConfig, Topic};
//!
//! #[tokio::main]
//! async fn main() -> datasource::Result<()> {
//!     let config = FetchConfig::from_env()?;
//!     let orchestrator = config.orchestrator();
//!
//!     let topics = [Topic::new("bybit-linear|candle?symbol=BTCUSDT&interval=1m")];
//!     let frames = orchestrator.fetch_all(&topics).await?;
//!     print!("{}", datasource::display::render(&frames, 5));
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use datasource_core::*;

// Providers
#[cfg(feature = "cybotrade")]
pub use datasource_cybotrade::CybotradeProvider;

/// Environment-driven configuration.
#[cfg(feature = "cybotrade")]
pub mod config;
/// Console rendering of fetched tables.
pub mod display;
mod orchestrator;

#[cfg(feature = "cybotrade")]
pub use config::FetchConfig;
pub use orchestrator::FetchOrchestrator;

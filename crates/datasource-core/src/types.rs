//! Core data types.
//!
//! - [`Topic`] - Opaque identifier for a provider series and its query parameters
//! - [`TopicFrame`] - A fetched table paired with the topic it came from

use polars::prelude::DataFrame;
use std::fmt;
use std::str::FromStr;

/// A topic identifier such as `bybit-linear|candle?symbol=BTCUSDT&interval=1m`.
///
/// Topics are opaque: they are stored and displayed verbatim and never
/// validated here. Interpreting them is up to the provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Creates a new topic from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the topic as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Topic {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A result table together with the topic that produced it.
#[derive(Clone, Debug)]
pub struct TopicFrame {
    /// The topic that was queried.
    pub topic: Topic,
    /// Rows returned by the provider, columns as the provider defines them.
    pub frame: DataFrame,
}

impl TopicFrame {
    /// Pairs a frame with its topic.
    #[must_use]
    pub const fn new(topic: Topic, frame: DataFrame) -> Self {
        Self { topic, frame }
    }

    /// Number of rows in the frame.
    #[must_use]
    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

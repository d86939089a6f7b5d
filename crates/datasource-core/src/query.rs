//! Query parameters for paginated requests.

use chrono::{DateTime, Utc};

use crate::{
    error::{DataError, Result},
    types::Topic,
};

/// Default maximum number of rows requested per page.
pub const DEFAULT_PAGE_LIMIT: usize = 10_000;

/// A paginated query for all records of a single topic.
///
/// The time range is optional on both ends. Without it the provider decides
/// which records are returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginatedQuery {
    /// Topic to query.
    pub topic: Topic,
    /// Maximum number of rows per page.
    pub limit: usize,
    /// Inclusive lower bound on record time.
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive upper bound on record time.
    pub end_time: Option<DateTime<Utc>>,
}

impl PaginatedQuery {
    /// Creates a query for `topic` with the default page limit and no time range.
    #[must_use]
    pub fn new(topic: impl Into<Topic>) -> Self {
        Self {
            topic: topic.into(),
            limit: DEFAULT_PAGE_LIMIT,
            start_time: None,
            end_time: None,
        }
    }

    /// Sets the page limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Bounds the query to a time range. Either end may be open.
    #[must_use]
    pub const fn with_range(
        mut self,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Checks the parameters that can be checked without asking the provider.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(DataError::InvalidParameter(
                "limit must be greater than zero".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start > end {
                return Err(DataError::InvalidParameter(format!(
                    "start_time {start} is after end_time {end}"
                )));
            }
        }
        Ok(())
    }
}

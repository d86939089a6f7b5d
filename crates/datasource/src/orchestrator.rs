//! Concurrent fan-out of paginated topic queries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, info};

use datasource_core::{
    DEFAULT_PAGE_LIMIT, DataProvider, PaginatedDataProvider, PaginatedQuery, Result, Topic,
    TopicFrame,
};

/// Fetches many topics from one provider at once.
///
/// Every topic gets its own paginated query and all queries are in flight
/// together. Results come back in the order the topics were given. If any
/// query fails the whole batch fails and the remaining queries are dropped.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use datasource::{CybotradeProvider, FetchOrchestrator, Topic};
///
/// let orchestrator = FetchOrchestrator::new(Arc::new(CybotradeProvider::new("key")))
///     .with_limit(10_000);
///
/// let frames = orchestrator
///     .fetch_all(&[
///         Topic::new("cryptoquant|btc/market-data/open-interest?exchange=bybit&window=min"),
///         Topic::new("glassnode|market/deltacap_usd?a=BTC&i=10m"),
///     ])
///     .await?;
/// ```
#[derive(Clone)]
pub struct FetchOrchestrator {
    provider: Arc<dyn PaginatedDataProvider>,
    limit: usize,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for FetchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("provider", &self.provider.name())
            .field("limit", &self.limit)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .finish()
    }
}

impl FetchOrchestrator {
    /// Create an orchestrator over `provider` with the default page limit.
    #[must_use]
    pub fn new(provider: Arc<dyn PaginatedDataProvider>) -> Self {
        Self {
            provider,
            limit: DEFAULT_PAGE_LIMIT,
            start_time: None,
            end_time: None,
        }
    }

    /// Set the page-size limit passed to every query.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Bound every query to a time range. Either end may be open.
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

    /// The query issued for `topic`.
    fn query_for(&self, topic: &Topic) -> PaginatedQuery {
        PaginatedQuery::new(topic.clone())
            .with_limit(self.limit)
            .with_range(self.start_time, self.end_time)
    }

    /// Fetch every topic concurrently.
    ///
    /// Returns one [`TopicFrame`] per topic, positionally aligned with
    /// `topics`. An empty slice returns an empty vector without touching the
    /// provider.
    pub async fn fetch_all(&self, topics: &[Topic]) -> Result<Vec<TopicFrame>> {
        if topics.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            provider = self.provider.name(),
            topics = topics.len(),
            limit = self.limit,
            "Fetching topics"
        );

        let frames = try_join_all(topics.iter().map(|topic| self.fetch_one(topic))).await?;

        debug!(
            rows = frames.iter().map(TopicFrame::height).sum::<usize>(),
            "All topics fetched"
        );
        Ok(frames)
    }

    async fn fetch_one(&self, topic: &Topic) -> Result<TopicFrame> {
        let query = self.query_for(topic);
        debug!(provider = self.provider.name(), topic = %topic, "Fetching topic");

        let frame = self.provider.query_paginated(&query).await?;
        debug!(topic = %topic, rows = frame.height(), "Topic fetched");

        Ok(TopicFrame::new(topic.clone(), frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use datasource_core::DataError;
    use polars::prelude::{Column, DataFrame};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Synthetic provider: each topic maps to a row count, an optional delay,
    /// or a failure.
    #[derive(Debug, Default)]
    struct StubProvider {
        rows: HashMap<String, usize>,
        delays: HashMap<String, Duration>,
        failing: Option<String>,
        calls: AtomicUsize,
        seen: Mutex<Vec<PaginatedQuery>>,
    }

    impl StubProvider {
        fn with_rows(mut self, topic: &str, rows: usize) -> Self {
            self.rows.insert(topic.to_string(), rows);
            self
        }

        fn with_delay(mut self, topic: &str, delay: Duration) -> Self {
            self.delays.insert(topic.to_string(), delay);
            self
        }

        fn failing_on(mut self, topic: &str) -> Self {
            self.failing = Some(topic.to_string());
            self
        }
    }

    impl DataProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn description(&self) -> &str {
            "Synthetic tables for tests"
        }
    }

    #[async_trait]
    impl PaginatedDataProvider for StubProvider {
        async fn query_paginated(&self, query: &PaginatedQuery) -> Result<DataFrame> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(query.clone());

            let topic = query.topic.as_str();
            if let Some(delay) = self.delays.get(topic) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing.as_deref() == Some(topic) {
                return Err(DataError::TopicNotFound(topic.to_string()));
            }

            let n = self.rows.get(topic).copied().unwrap_or(1);
            let values: Vec<i64> = (0..n as i64).collect();
            let df = DataFrame::new(vec![
                Column::new("topic".into(), vec![topic; n]),
                Column::new("start_time".into(), values),
            ])
            .unwrap();
            Ok(df)
        }
    }

    fn topics(names: &[&str]) -> Vec<Topic> {
        names.iter().map(|n| Topic::new(*n)).collect()
    }

    #[tokio::test]
    async fn test_two_topics_in_order() {
        let stub = Arc::new(StubProvider::default().with_rows("A", 3).with_rows("B", 0));
        let orchestrator = FetchOrchestrator::new(stub.clone());

        let frames = orchestrator.fetch_all(&topics(&["A", "B"])).await.unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].topic.as_str(), "A");
        assert_eq!(frames[0].height(), 3);
        assert_eq!(frames[1].topic.as_str(), "B");
        assert_eq!(frames[1].height(), 0);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_order_preserved_despite_completion_order() {
        // The first topic finishes last.
        let stub = StubProvider::default()
            .with_rows("slow", 2)
            .with_rows("medium", 4)
            .with_rows("fast", 6)
            .with_delay("slow", Duration::from_millis(60))
            .with_delay("medium", Duration::from_millis(30));
        let orchestrator = FetchOrchestrator::new(Arc::new(stub));

        let frames = orchestrator
            .fetch_all(&topics(&["slow", "medium", "fast"]))
            .await
            .unwrap();

        let order: Vec<&str> = frames.iter().map(|f| f.topic.as_str()).collect();
        assert_eq!(order, vec!["slow", "medium", "fast"]);
        let heights: Vec<usize> = frames.iter().map(TopicFrame::height).collect();
        assert_eq!(heights, vec![2, 4, 6]);
    }

    #[tokio::test]
    async fn test_requests_run_concurrently() {
        let stub = StubProvider::default()
            .with_delay("A", Duration::from_millis(200))
            .with_delay("B", Duration::from_millis(200))
            .with_delay("C", Duration::from_millis(200));
        let orchestrator = FetchOrchestrator::new(Arc::new(stub));

        let started = std::time::Instant::now();
        let frames = orchestrator.fetch_all(&topics(&["A", "B", "C"])).await.unwrap();

        assert_eq!(frames.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_batch() {
        let stub = StubProvider::default().failing_on("B");
        let orchestrator = FetchOrchestrator::new(Arc::new(stub));

        let result = orchestrator.fetch_all(&topics(&["A", "B", "C"])).await;

        assert!(matches!(result, Err(DataError::TopicNotFound(t)) if t == "B"));
    }

    #[tokio::test]
    async fn test_empty_topics_make_no_calls() {
        let stub = Arc::new(StubProvider::default());
        let orchestrator = FetchOrchestrator::new(stub.clone());

        let frames = orchestrator.fetch_all(&[]).await.unwrap();

        assert!(frames.is_empty());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_limit_and_range_forwarded() {
        let stub = Arc::new(StubProvider::default());
        let start = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = "2025-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let orchestrator = FetchOrchestrator::new(stub.clone())
            .with_limit(500)
            .with_range(Some(start), Some(end));

        orchestrator.fetch_all(&topics(&["A"])).await.unwrap();

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].limit, 500);
        assert_eq!(seen[0].start_time, Some(start));
        assert_eq!(seen[0].end_time, Some(end));
    }

    #[test]
    fn test_default_limit() {
        let orchestrator = FetchOrchestrator::new(Arc::new(StubProvider::default()));
        assert_eq!(orchestrator.limit, 10_000);
        assert!(format!("{orchestrator:?}").contains("stub"));
    }
}

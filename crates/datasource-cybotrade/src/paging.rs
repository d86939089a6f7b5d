//! Time-cursor pagination.
//!
//! A page holding exactly `limit` rows may have more behind it. The next page
//! starts at the `start_time` of the last row received, inclusive, so rows
//! sharing that timestamp on the far side of the page boundary are not lost.
//! Rows at the cursor timestamp that were already collected, and rows older
//! than the cursor, are dropped from the next page.
//!
//! A full page made up entirely of rows at the cursor timestamp cannot be
//! paged through: asking again returns the same page. The cursor then moves
//! one millisecond past it.

use std::future::Future;

use datasource_core::Result;
use serde_json::Value;
use tracing::{debug, warn};

/// Row field used as the paging cursor, in Unix milliseconds.
pub(crate) const CURSOR_FIELD: &str = "start_time";

/// Parameters for a single page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageRequest {
    pub(crate) start_time: Option<i64>,
    pub(crate) end_time: Option<i64>,
    pub(crate) limit: usize,
}

/// Requests pages until the topic is exhausted and returns every row in order.
pub(crate) async fn collect_pages<F, Fut>(first: PageRequest, mut fetch_page: F) -> Result<Vec<Value>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<Value>>>,
{
    let mut rows = Vec::new();
    let mut request = first;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(request).await?;
        pages += 1;

        let mut seen = match request.start_time {
            Some(cursor) => rows_at(&rows, cursor),
            None => Vec::new(),
        };
        let cursor = next_cursor(&page, &request);
        let received = page.len();

        let mut fresh = 0usize;
        for row in page {
            let stale = request
                .start_time
                .zip(cursor_of(&row))
                .is_some_and(|(start, t)| t < start);
            if stale {
                continue;
            }
            if let Some(pos) = seen.iter().position(|s| *s == row) {
                seen.swap_remove(pos);
                continue;
            }
            rows.push(row);
            fresh += 1;
        }

        debug!(page = pages, received, fresh, next = ?cursor, "Page received");

        match cursor {
            Some(next) if fresh > 0 || request.start_time != Some(next) => {
                request.start_time = Some(next);
            }
            _ => break,
        }
    }

    Ok(rows)
}

/// Rows at the end of `rows` whose cursor field equals `timestamp`.
fn rows_at(rows: &[Value], timestamp: i64) -> Vec<Value> {
    rows.iter()
        .rev()
        .take_while(|row| cursor_of(row) == Some(timestamp))
        .cloned()
        .collect()
}

fn cursor_of(row: &Value) -> Option<i64> {
    row.get(CURSOR_FIELD)?.as_i64()
}

/// Cursor for the page after `page`, or `None` when there is nothing more to ask for.
fn next_cursor(page: &[Value], request: &PageRequest) -> Option<i64> {
    if page.len() < request.limit {
        return None;
    }

    let first = cursor_of(page.first()?)?;
    let last = cursor_of(page.last()?)?;

    let next = if request.start_time == Some(last) && first == last {
        warn!(
            start_time = last,
            limit = request.limit,
            "Page holds only one timestamp, skipping past it"
        );
        last.checked_add(1)?
    } else {
        last
    };

    // Must not move backwards, and must stay inside the requested range.
    if request.start_time.is_some_and(|current| next < current) {
        return None;
    }
    if request.end_time.is_some_and(|end| next > end) {
        return None;
    }

    Some(next)
}

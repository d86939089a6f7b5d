//! Datasource CLI: fetch a batch of topics concurrently and print a preview
//! of each resulting table.
//!
//! With no arguments the default topic batch is fetched with a page limit of
//! 10000. Credentials come from `CYBOTRADE_API_KEY`, optionally via `.env`.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use datasource::display::{self, DEFAULT_PREVIEW_ROWS};
use datasource::{DEFAULT_PAGE_LIMIT, FetchConfig, Topic};
use tracing_subscriber::EnvFilter;

/// Topics fetched when none are given on the command line.
const DEFAULT_TOPICS: &[&str] = &["bybit-linear|candle?symbol=BTCUSDT&interval=1m"];

#[derive(Debug, Parser)]
#[command(
    name = "datasource",
    about = "Fetch market data topics concurrently and print table previews"
)]
struct Cli {
    /// Topics to fetch, e.g. "cryptoquant|btc/market-data/open-interest?exchange=bybit&window=min".
    /// Defaults to the built-in batch.
    topics: Vec<String>,

    /// Maximum rows per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: usize,

    /// Only records at or after this time (YYYY-MM-DD or RFC 3339, UTC).
    #[arg(long, value_parser = parse_time)]
    start: Option<DateTime<Utc>>,

    /// Only records at or before this time (YYYY-MM-DD or RFC 3339, UTC).
    #[arg(long, value_parser = parse_time)]
    end: Option<DateTime<Utc>>,

    /// Rows shown per table.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,
}

impl Cli {
    fn topics(&self) -> Vec<Topic> {
        if self.topics.is_empty() {
            DEFAULT_TOPICS.iter().map(|t| Topic::new(*t)).collect()
        } else {
            self.topics.iter().map(|t| Topic::new(t.as_str())).collect()
        }
    }
}

fn parse_time(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date: {s}"));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected YYYY-MM-DD or RFC 3339, got {s:?}: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional: a missing .env is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = FetchConfig::from_env()
        .context("cannot start without a Cybotrade API key")?
        .with_limit(cli.limit);

    let orchestrator = config.orchestrator().with_range(cli.start, cli.end);

    let topics = cli.topics();
    tracing::debug!(?orchestrator, topics = topics.len(), "Starting batch");

    let frames = orchestrator
        .fetch_all(&topics)
        .await
        .context("topic batch failed")?;

    print!("{}", display::render(&frames, cli.preview_rows));
    Ok(())
}

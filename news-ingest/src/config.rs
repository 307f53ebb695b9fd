use std::time::Duration;

use clap::Parser;

/// CLI/env configuration for the ingestion engine: `DATABASE_URL` from the
/// environment, supplemented with `clap` derive flags for everything else.
#[derive(Debug, Parser)]
#[command(name = "news-ingest", about = "RSS ingestion & query engine")]
pub struct Config {
    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Comma-separated list of RSS feed URLs to poll.
    #[arg(long, env = "NEWS_SOURCES", value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Seconds between ingest ticks.
    #[arg(long, env = "NEWS_POLL_INTERVAL_SECS", default_value_t = 900)]
    pub poll_interval_secs: u64,

    /// Max concurrent feed fetches per tick.
    #[arg(long, env = "NEWS_FETCH_CONCURRENCY", default_value_t = 6)]
    pub fetch_concurrency: usize,

    /// Address the RPC (HTTP/JSON) surface binds to.
    #[arg(long, env = "NEWS_RPC_ADDR", default_value = "0.0.0.0:7000")]
    pub rpc_addr: String,

    /// Address the management listener (`/livez`, `/healthz`, `/metrics`) binds to.
    #[arg(long, env = "NEWS_MGMT_ADDR", default_value = "0.0.0.0:7001")]
    pub mgmt_addr: String,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

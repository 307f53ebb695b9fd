use std::time::Duration;

use clap::Parser;

/// CLI/env configuration for the gateway, mirroring `news-ingest`'s
/// `Config` shape.
#[derive(Debug, Parser)]
#[command(name = "gateway", about = "News aggregation REST gateway")]
pub struct Config {
    /// Address the gateway's REST surface binds to.
    #[arg(long, env = "GATEWAY_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: String,

    /// Base URL of the news-ingest RPC (HTTP/JSON) surface.
    #[arg(long, env = "NEWS_SERVICE_URL", default_value = "http://127.0.0.1:7000")]
    pub news_service_url: String,

    /// Per-request timeout enforced by the gateway's Timeout middleware, in
    /// milliseconds.
    #[arg(long, env = "GATEWAY_TIMEOUT_MS", default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Per-call timeout for the outbound news client, in milliseconds.
    #[arg(long, env = "NEWS_CLIENT_TIMEOUT_MS", default_value_t = 3000)]
    pub news_client_timeout_ms: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn news_client_timeout(&self) -> Duration {
        Duration::from_millis(self.news_client_timeout_ms)
    }
}

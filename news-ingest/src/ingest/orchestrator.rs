use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{AggregatorError, Result};
use crate::feed::parser::FeedParser;
use crate::ingest::finalizer::finalize;
use crate::store::NewsStore;

/// §4.C1b Ingest Orchestrator: ticks immediately then every `interval`,
/// fanning each tick out to the Feed Parser and batching finalized items
/// into a single store call.
pub struct Orchestrator {
    sources: Vec<String>,
    interval: StdDuration,
    parser: Arc<FeedParser>,
    store: Arc<dyn NewsStore>,
}

impl Orchestrator {
    pub fn new(sources: Vec<String>, interval: StdDuration, parser: Arc<FeedParser>, store: Arc<dyn NewsStore>) -> Self {
        Self { sources, interval, parser, store }
    }

    /// Runs until `cancel` fires. Fails immediately if no sources are
    /// configured; otherwise never returns an error (per-URL and per-tick
    /// failures are logged and swallowed, per §7's propagation policy).
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        if self.sources.is_empty() {
            return Err(AggregatorError::NoSources);
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick(cancel.child_token()).await {
                        error!(error = %e, "ingest tick failed to save batch");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("ingest orchestrator shutting down");
                    return Ok(());
                }
            }
        }
    }

    async fn tick(&self, cancel: CancellationToken) -> Result<()> {
        let now = Utc::now();
        let mut results = self.parser.parse_many(cancel, self.sources.clone());

        let mut batch = Vec::new();

        while let Some(result) = results.recv().await {
            match result.outcome {
                Ok(items) => {
                    for item in items {
                        if let Some(finalized) = finalize(item, now) {
                            batch.push(finalized);
                        }
                    }
                }
                Err(err) => {
                    warn!(url = %result.url, error = %err, "failed to parse feed");
                }
            }
        }

        if batch.is_empty() {
            return Ok(());
        }

        self.store.save_news(&batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fails_immediately_with_no_sources() {
        let parser = Arc::new(FeedParser::new(reqwest::Client::new()));
        let store: Arc<dyn NewsStore> = Arc::new(crate::store::MemoryNewsStore::default());
        let orchestrator = Orchestrator::new(Vec::new(), StdDuration::from_secs(60), parser, store);
        let err = orchestrator.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, AggregatorError::NoSources));
    }
}

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use news_ingest::config::Config;
use news_ingest::feed::parser::FeedParser;
use news_ingest::ingest::Orchestrator;
use news_ingest::rpc::{build_router, RpcState};
use news_ingest::{management, QueryFacade};
use news_ingest::store::{NewsStore, PgNewsStore};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    info!("connecting to database");
    let store = PgNewsStore::connect(&config.database_url).await.map_err(|e| {
        error!("failed to connect to database: {e}");
        anyhow::anyhow!(e)
    })?;
    store.migrate().await?;
    let store: Arc<dyn NewsStore> = Arc::new(store);

    let facade = QueryFacade::new(store.clone());
    let ready = Arc::new(AtomicBool::new(true));
    let rpc_state = Arc::new(RpcState::new(facade));

    let cancel = CancellationToken::new();

    let client = reqwest::Client::builder()
        .user_agent("news-ingest/0.1")
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let parser = Arc::new(FeedParser::new(client).with_concurrency(config.fetch_concurrency));
    let orchestrator = Orchestrator::new(config.sources.clone(), config.poll_interval(), parser, store);

    let orchestrator_cancel = cancel.clone();
    let orchestrator_handle = tokio::spawn(async move {
        if let Err(e) = orchestrator.run(orchestrator_cancel).await {
            error!("ingest orchestrator exited with error: {e}");
        }
    });

    let rpc_addr: std::net::SocketAddr = config.rpc_addr.parse()?;
    let rpc_listener = tokio::net::TcpListener::bind(rpc_addr).await?;
    info!("RPC surface listening on {rpc_addr}");
    let rpc_router = build_router(rpc_state);
    let rpc_cancel = cancel.clone();
    let rpc_handle = tokio::spawn(async move {
        let server = axum::serve(rpc_listener, rpc_router).with_graceful_shutdown(async move {
            rpc_cancel.cancelled().await;
        });
        if let Err(e) = server.await {
            error!("RPC server error: {e}");
        }
    });

    let mgmt_addr: std::net::SocketAddr = config.mgmt_addr.parse()?;
    let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;
    info!("management listener on {mgmt_addr}");
    let mgmt_router = management::build_router(ready.clone());
    let mgmt_cancel = cancel.clone();
    let mgmt_handle = tokio::spawn(async move {
        let server = axum::serve(mgmt_listener, mgmt_router).with_graceful_shutdown(async move {
            mgmt_cancel.cancelled().await;
        });
        if let Err(e) = server.await {
            error!("management server error: {e}");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, stopping within the grace period");
    ready.store(false, std::sync::atomic::Ordering::SeqCst);
    cancel.cancel();

    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        futures::future::join3(orchestrator_handle, rpc_handle, mgmt_handle),
    )
    .await;

    Ok(())
}

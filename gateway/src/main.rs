use std::sync::Arc;

use clap::Parser;
use gateway::clients::auth::AuthClient;
use gateway::clients::comments::CommentsClient;
use gateway::clients::news::NewsClient;
use gateway::clients::users::UsersClient;
use gateway::config::Config;
use gateway::router::build_router;
use gateway::state::AppState;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let state = Arc::new(AppState {
        news: NewsClient::new(config.news_service_url.clone(), config.news_client_timeout()),
        auth: AuthClient::default(),
        comments: CommentsClient::default(),
        users: UsersClient::default(),
    });

    let router = build_router(state, config.timeout());

    let cancel = CancellationToken::new();
    let addr: std::net::SocketAddr = config.addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("gateway listening on {addr}");

    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            server_cancel.cancelled().await;
        });
        if let Err(e) = server.await {
            error!("gateway server error: {e}");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, stopping within the grace period");
    cancel.cancel();

    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), server_handle).await;

    Ok(())
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

/// Management listener (§6): `/livez` always 200, `/healthz` reflects the
/// shared ready flag, `/metrics` is a stub exposition point — Prometheus
/// formatting itself is out of scope (§1), this only proves the interface
/// contract is wired up.
pub fn build_router(ready: Arc<AtomicBool>) -> Router {
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(move || healthz(ready.clone())))
        .route("/metrics", get(metrics))
}

async fn livez() -> StatusCode {
    StatusCode::OK
}

async fn healthz(ready: Arc<AtomicBool>) -> StatusCode {
    if ready.load(Ordering::SeqCst) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics() -> &'static str {
    "# news-ingest process metrics placeholder\n"
}

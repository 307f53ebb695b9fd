use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use crate::context::RequestId;

/// Emits exactly one `"http"` INFO record per request, after the response
/// is known, with the fields the downstream log pipeline keys off of
/// (§4.C3a.3). Mirrors the request/response-around-`next.run` shape used
/// for the web layer's own logging middleware.
pub async fn logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    let start = Instant::now();
    let response = next.run(req).await;
    let dur_ms = start.elapsed().as_secs_f64() * 1000.0;

    let bytes_written = response
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        target: "http",
        request_id = request_id,
        method = %method,
        path = path,
        status = response.status().as_u16(),
        bytes_written,
        dur_ms,
        "http"
    );

    response
}

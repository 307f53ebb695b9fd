use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;
use tracing::error;

use crate::error::{map_error, UpstreamKind};
use crate::middleware::request_id::HEADER_NAME;

/// Catches a panic from ANY downstream layer — not just the handler — and
/// turns it into the standard 500/`internal` envelope (§4.C3a.1). Recover
/// sits outside RequestID, so it cannot rely on RequestID's extension
/// having been populated; it reads the inbound `X-Request-Id` header
/// straight off the request before handing it to `next`, which is what
/// lets the id still appear on the error response even when the panic
/// unwinds past RequestID's own post-processing (invariant 10).
pub async fn recover(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match std::panic::AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let detail = panic_message(payload);
            error!(panic = detail, "recovered from panic");
            let mut response = map_error(Some(UpstreamKind::Internal), "internal error", request_id.clone());
            if let Some(id) = request_id {
                if let Ok(value) = axum::http::HeaderValue::from_str(&id) {
                    response.headers_mut().insert(HEADER_NAME, value);
                }
            }
            response
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn router() -> Router {
        Router::new()
            .route("/boom", get(|| async { panic!("synthetic panic") }))
            .layer(axum::middleware::from_fn(recover))
    }

    #[tokio::test]
    async fn panic_becomes_500_internal() {
        let response = router()
            .oneshot(axum::http::Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn echoes_inbound_request_id_on_panic() {
        let response = router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/boom")
                    .header(HEADER_NAME, "caller-supplied-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

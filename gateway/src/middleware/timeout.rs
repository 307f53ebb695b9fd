use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::context::{Deadline, RequestId};
use crate::error::{map_error, UpstreamKind};

/// Attaches a deadline to the request context and enforces it, unless a
/// shorter deadline is already in force (§4.C3a.5) — a no-op `Timeout(0)`
/// or negative duration never tightens anything either. Releases the
/// deadline implicitly: it lives only on this request's extensions, which
/// are dropped with the request regardless of which exit path is taken.
pub fn timeout_layer(duration: Duration) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>> + Clone {
    move |mut req: Request, next: Next| {
        Box::pin(async move {
            let existing = req.extensions().get::<Deadline>().copied().unwrap_or_default();

            if duration.is_zero() {
                req.extensions_mut().insert(existing);
                return next.run(req).await;
            }

            let now = Instant::now();
            let candidate = now + duration;

            let effective = match existing.0 {
                Some(existing_deadline) if existing_deadline <= candidate => existing_deadline,
                _ => candidate,
            };
            req.extensions_mut().insert(Deadline(Some(effective)));

            let request_id = req.extensions().get::<RequestId>().map(|r| r.0.clone());
            let remaining = effective.saturating_duration_since(Instant::now());

            match tokio::time::timeout(remaining, next.run(req)).await {
                Ok(response) => response,
                Err(_) => map_error(
                    Some(UpstreamKind::DeadlineExceeded),
                    "request exceeded its deadline",
                    request_id,
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn zero_duration_is_noop() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(timeout_layer(Duration::ZERO)));
        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn slow_handler_times_out() {
        let app = Router::new()
            .route(
                "/",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    "ok"
                }),
            )
            .layer(axum::middleware::from_fn(timeout_layer(Duration::from_millis(5))));
        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::GATEWAY_TIMEOUT);
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use gateway::middleware::logging::logging;
use gateway::middleware::recover::recover;
use gateway::middleware::request_id::{request_id, HEADER_NAME};
use tower::ServiceExt;

fn panicking_router() -> Router {
    Router::new()
        .route("/boom", get(|| async { panic!("synthetic panic") }))
        .layer(axum::middleware::from_fn(logging))
        .layer(axum::middleware::from_fn(request_id))
        .layer(axum::middleware::from_fn(recover))
}

/// S5: a handler panic surfaces as HTTP 500 with `code="internal"`, and the
/// `X-Request-Id` response header equals the one the client sent.
#[tokio::test]
async fn s5_panic_becomes_500_internal_with_request_id() {
    let response = panicking_router()
        .oneshot(
            Request::builder()
                .uri("/boom")
                .header(HEADER_NAME, "client-request-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers().get(HEADER_NAME).unwrap(), "client-request-id");
}

/// Invariant 10 / S10: the `X-Request-Id` echoed after a panic matches the
/// id the client sent, so request-id propagation survives a panic in the
/// inner handler being caught by Recover (which sits outside RequestID).
#[tokio::test]
async fn s10_request_id_propagates_across_panic() {
    let response = panicking_router()
        .oneshot(
            Request::builder()
                .uri("/boom")
                .header(HEADER_NAME, "caller-supplied-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers().get(HEADER_NAME).unwrap(), "caller-supplied-id");
}

/// A panic on a request with no inbound `X-Request-Id` still surfaces as a
/// 500 — there is simply nothing for Recover to echo, since RequestID's
/// own id-minting code runs inside Recover and never completes once the
/// handler has panicked.
#[tokio::test]
async fn panic_without_inbound_request_id_still_returns_500() {
    let response = panicking_router()
        .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(HEADER_NAME).is_none());
}

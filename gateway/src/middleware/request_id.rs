use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::context::RequestId;

pub const HEADER_NAME: &str = "x-request-id";

/// Reads an inbound `X-Request-Id`, or mints a new 128-bit hex id, stores it
/// on the request extensions for downstream handlers/middleware, and echoes
/// it back on the response (§4.C3a.2).
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(HEADER_NAME, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn handler(axum::Extension(id): axum::Extension<RequestId>) -> String {
        id.0
    }

    #[tokio::test]
    async fn generates_id_when_absent() {
        let app = Router::new()
            .route("/", get(handler))
            .layer(axum::middleware::from_fn(request_id));
        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get(HEADER_NAME).is_some());
    }

    #[tokio::test]
    async fn echoes_inbound_id() {
        let app = Router::new()
            .route("/", get(handler))
            .layer(axum::middleware::from_fn(request_id));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .header(HEADER_NAME, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers().get(HEADER_NAME).unwrap(), "abc-123");
    }
}

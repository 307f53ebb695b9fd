use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::context::AuthToken;

/// Extracts a `Bearer` token into the request context, if present and
/// well-formed. Never rejects the request itself — authn/authz policy is
/// enforced by downstream handlers that actually need a principal
/// (§4.C3a.4); this middleware only makes the token available.
pub async fn auth_bearer(mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    req.extensions_mut().insert(AuthToken(token));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn handler(axum::Extension(token): axum::Extension<AuthToken>) -> String {
        token.0.unwrap_or_default()
    }

    #[tokio::test]
    async fn extracts_bearer_token() {
        let app = Router::new()
            .route("/", get(handler))
            .layer(axum::middleware::from_fn(auth_bearer));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .header(AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_header_does_not_reject() {
        let app = Router::new()
            .route("/", get(handler))
            .layer(axum::middleware::from_fn(auth_bearer));
        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}

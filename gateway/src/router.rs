use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, comments, news, users};
use crate::middleware::{auth::auth_bearer, logging::logging, recover::recover, request_id::request_id, timeout::timeout_layer};
use crate::state::AppState;

/// Builds the full gateway router, mounted at `/api` (§6). Middleware is
/// applied outer-to-inner as `[Recover, RequestID, Logging, AuthBearer,
/// Timeout]` (§4.C3a) — `tower::ServiceBuilder` nests layers so the
/// *first* `.layer()` call ends up outermost, so the calls below run in
/// that same order, not its reverse.
pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/revoke", post(auth::revoke))
        .route("/auth/validate", post(auth::validate))
        .route("/news", get(news::list_news))
        .route("/news/:id", get(news::get_news))
        .route("/comments", post(comments::create))
        .route("/comments/:id", get(comments::get))
        .route("/news/:news_id/comments", get(comments::list_for_news))
        .route("/comments/:id/replies", get(comments::replies))
        .route("/users/:id", get(users::get).patch(users::update))
        .route("/users/:id/avatar/presign", post(users::presign_avatar))
        .route("/users/:id/avatar/confirm", post(users::confirm_avatar))
        .with_state(state);

    Router::new().nest("/api", api).layer(
        tower::ServiceBuilder::new()
            .layer(axum::middleware::from_fn(recover))
            .layer(axum::middleware::from_fn(request_id))
            .layer(axum::middleware::from_fn(logging))
            .layer(axum::middleware::from_fn(auth_bearer))
            .layer(axum::middleware::from_fn(timeout_layer(request_timeout))),
    )
}

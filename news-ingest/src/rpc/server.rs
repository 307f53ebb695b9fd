use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use news_domain::{DomainError, ListOptions, NewsItem, Page};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facade::QueryFacade;

/// §4.E RPC Transport (News): the two unary methods exposed as HTTP/JSON
/// rather than gRPC, using JSON over HTTP as the transport.
pub struct RpcState {
    pub facade: QueryFacade,
    pub ready: AtomicBool,
}

impl RpcState {
    pub fn new(facade: QueryFacade) -> Self {
        Self { facade, ready: AtomicBool::new(true) }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListNewsQuery {
    #[serde(default)]
    pub limit: i32,
    #[serde(default)]
    pub page_token: String,
}

/// Wire shape for a news item: identical to the domain type except
/// `published_at`/`fetched_at` cross the wire as Unix seconds (§4.E, §6)
/// rather than chrono's RFC3339 default.
#[derive(Debug, Serialize)]
pub struct WireNewsItem {
    pub id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub link: String,
    pub image_url: Option<String>,
    #[serde(with = "news_domain::wire::unix_seconds")]
    pub published_at: chrono::DateTime<chrono::Utc>,
    #[serde(with = "news_domain::wire::unix_seconds")]
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

impl From<NewsItem> for WireNewsItem {
    fn from(item: NewsItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            category: item.category,
            short_description: item.short_description,
            long_description: item.long_description,
            link: item.link,
            image_url: item.image_url,
            published_at: item.published_at,
            fetched_at: item.fetched_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WirePage {
    pub items: Vec<WireNewsItem>,
    pub next_page_token: String,
}

impl From<Page> for WirePage {
    fn from(page: Page) -> Self {
        Self {
            items: page.items.into_iter().map(WireNewsItem::from).collect(),
            next_page_token: page.next_page_token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Canonical RPC error body. §4.E collapses every domain error but
/// `InvalidCursor` and `NotFound` into `Internal` with a fixed safe
/// message, never leaking internal detail across the wire.
#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: &'static str,
    pub message: String,
}

impl From<DomainError> for RpcError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCursor => RpcError {
                code: "invalid_argument",
                message: "invalid page token".to_string(),
            },
            DomainError::InvalidArgument(msg) => RpcError { code: "invalid_argument", message: msg },
            DomainError::NotFound => RpcError { code: "not_found", message: "not found".to_string() },
            _ => RpcError { code: "internal", message: "internal error".to_string() },
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match self.code {
            "invalid_argument" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

async fn list_news(
    State(state): State<Arc<RpcState>>,
    Query(query): Query<ListNewsQuery>,
) -> Result<Json<WirePage>, RpcError> {
    let opts = ListOptions { limit: query.limit, page_token: query.page_token };
    let page = state.facade.list_news(opts).await?;
    Ok(Json(page.into()))
}

async fn get_news(
    State(state): State<Arc<RpcState>>,
    Path(id): Path<String>,
) -> Result<Json<WireNewsItem>, RpcError> {
    let item = state.facade.news_by_id(&id).await?;
    Ok(Json(item.into()))
}

async fn health(State(state): State<Arc<RpcState>>) -> Json<HealthBody> {
    let status = if state.ready.load(Ordering::SeqCst) { "SERVING" } else { "NOT_SERVING" };
    Json(HealthBody { status })
}

pub fn build_router(state: Arc<RpcState>) -> Router {
    Router::new()
        .route("/v1/news", get(list_news))
        .route("/v1/news/:id", get(get_news))
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryNewsStore;
    use std::sync::Arc as StdArc;
    use tower::ServiceExt;

    fn router() -> Router {
        let store: StdArc<dyn crate::store::NewsStore> = StdArc::new(MemoryNewsStore::default());
        let facade = QueryFacade::new(store);
        build_router(StdArc::new(RpcState::new(facade)))
    }

    #[tokio::test]
    async fn health_reports_serving() {
        let response = router()
            .oneshot(axum::http::Request::builder().uri("/health").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_news_unknown_id_is_not_found() {
        let response = router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/v1/news/00000000-0000-0000-0000-000000000000")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

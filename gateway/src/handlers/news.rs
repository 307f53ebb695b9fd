use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::context::{AuthToken, Deadline, RequestId};
use crate::error::{GatewayError, UpstreamKind};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListNewsQuery {
    #[serde(default)]
    pub limit: i32,
    #[serde(default)]
    pub page_token: String,
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListNewsQuery>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<crate::clients::NewsPage>, GatewayError> {
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    let page = state
        .news
        .list_news(&ctx, query.limit, &query.page_token)
        .await
        .map_err(|kind| GatewayError::new(kind, "failed to list news"))?;
    Ok(Json(page))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<news_domain::NewsItem>, GatewayError> {
    if id.is_empty() {
        return Err(GatewayError::invalid_argument("id must not be empty"));
    }
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    let item = state
        .news
        .news_by_id(&ctx, &id)
        .await
        .map_err(|kind| match kind {
            UpstreamKind::NotFound => GatewayError::not_found("not found"),
            other => GatewayError::new(other, "failed to fetch news item"),
        })?;
    Ok(Json(item))
}

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::context::{AuthToken, Deadline, RequestId};
use crate::error::GatewayError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentBody {
    pub news_id: String,
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Parses `page_size` from a raw query map so a non-numeric or negative
/// value surfaces as `invalid_argument` through the standard envelope
/// instead of axum's own query-rejection body.
fn parse_page_size(params: &HashMap<String, String>) -> Result<i64, GatewayError> {
    match params.get("page_size") {
        None => Ok(0),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| GatewayError::invalid_argument("page_size must be an integer"))
            .and_then(|n| {
                if n < 0 {
                    Err(GatewayError::invalid_argument("page_size must not be negative"))
                } else {
                    Ok(n)
                }
            }),
    }
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
    Json(body): Json<CreateCommentBody>,
) -> Result<Json<()>, GatewayError> {
    if body.news_id.is_empty() {
        return Err(GatewayError::invalid_argument("news_id must not be empty"));
    }
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .comments
        .create(&ctx, &body.news_id, &body.body)
        .await
        .map_err(|kind| GatewayError::new(kind, "comments service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<()>, GatewayError> {
    if id.is_empty() {
        return Err(GatewayError::invalid_argument("id must not be empty"));
    }
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .comments
        .get(&ctx, &id)
        .await
        .map_err(|kind| GatewayError::new(kind, "comments service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn list_for_news(
    State(state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<()>, GatewayError> {
    if news_id.is_empty() {
        return Err(GatewayError::invalid_argument("news_id must not be empty"));
    }
    parse_page_size(&params)?;
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .comments
        .list_for_news(&ctx, &news_id)
        .await
        .map_err(|kind| GatewayError::new(kind, "comments service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn replies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<()>, GatewayError> {
    if id.is_empty() {
        return Err(GatewayError::invalid_argument("id must not be empty"));
    }
    parse_page_size(&params)?;
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .comments
        .replies(&ctx, &id)
        .await
        .map_err(|kind| GatewayError::new(kind, "comments service not available in this deployment"))?;
    Ok(Json(()))
}

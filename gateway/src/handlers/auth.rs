use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::context::{AuthToken, Deadline, RequestId};
use crate::error::GatewayError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
    Json(body): Json<LoginBody>,
) -> Result<Json<()>, GatewayError> {
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .auth
        .register(&ctx, &body.username, &body.password)
        .await
        .map_err(|kind| GatewayError::new(kind, "auth service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
    Json(body): Json<LoginBody>,
) -> Result<Json<()>, GatewayError> {
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .auth
        .login(&ctx, &body.username, &body.password)
        .await
        .map_err(|kind| GatewayError::new(kind, "auth service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<()>, GatewayError> {
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .auth
        .refresh(&ctx)
        .await
        .map_err(|kind| GatewayError::new(kind, "auth service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn revoke(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<()>, GatewayError> {
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .auth
        .revoke(&ctx)
        .await
        .map_err(|kind| GatewayError::new(kind, "auth service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn validate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
) -> Result<Json<()>, GatewayError> {
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .auth
        .validate(&ctx)
        .await
        .map_err(|kind| GatewayError::new(kind, "auth service not available in this deployment"))?;
    Ok(Json(()))
}

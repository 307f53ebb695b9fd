use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::context::{AuthToken, Deadline, RequestId};
use crate::error::GatewayError;
use crate::state::AppState;

/// PATCH body for `/users/{id}`. The update mask is derived from field
/// presence, not sent explicitly: a field counts as "present" when it is
/// non-empty/non-zero after decoding, per the kept Open Question
/// resolution (§9 of SPEC_FULL.md).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserBody {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
}

fn update_mask(body: &UpdateUserBody) -> Vec<String> {
    let mut mask = Vec::new();
    if !body.display_name.is_empty() {
        mask.push("display_name".to_string());
    }
    if !body.bio.is_empty() {
        mask.push("bio".to_string());
    }
    mask
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
        .users
        .get(&ctx, &id)
        .await
        .map_err(|kind| GatewayError::new(kind, "user service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth): Extension<AuthToken>,
    Extension(deadline): Extension<Deadline>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<()>, GatewayError> {
    if id.is_empty() {
        return Err(GatewayError::invalid_argument("id must not be empty"));
    }
    let mask = update_mask(&body);
    let ctx = state.outbound_context(&request_id, &auth, &deadline);
    state
        .users
        .update(&ctx, &id, &mask)
        .await
        .map_err(|kind| GatewayError::new(kind, "user service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn presign_avatar(
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
        .users
        .presign_avatar(&ctx, &id)
        .await
        .map_err(|kind| GatewayError::new(kind, "user service not available in this deployment"))?;
    Ok(Json(()))
}

pub async fn confirm_avatar(
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
        .users
        .confirm_avatar(&ctx, &id)
        .await
        .map_err(|kind| GatewayError::new(kind, "user service not available in this deployment"))?;
    Ok(Json(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_includes_only_present_fields() {
        let body = UpdateUserBody { display_name: "new name".to_string(), bio: String::new() };
        assert_eq!(update_mask(&body), vec!["display_name".to_string()]);
    }

    #[test]
    fn mask_empty_when_nothing_present() {
        let body = UpdateUserBody { display_name: String::new(), bio: String::new() };
        assert!(update_mask(&body).is_empty());
    }
}

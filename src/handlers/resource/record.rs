use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser, JsonResult};

use super::body_record;

/// GET /api/v1/:resource/:id
pub async fn get(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((resource, id)): Path<(String, String)>,
) -> JsonResult {
    let data = state.service(&resource, user)?.show(&id).await?;
    Ok(ApiResponse::success(data))
}

/// PUT /api/v1/:resource/:id - Partial update
pub async fn put(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((resource, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> JsonResult {
    let service = state.service(&resource, user)?;
    let input = body_record(body)?;
    Ok(ApiResponse::success(service.update(&id, input).await?))
}

/// PATCH /api/v1/:resource/:id - Same semantics as PUT
pub async fn patch(
    state: Extension<AppState>,
    user: Extension<AuthUser>,
    path: Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> JsonResult {
    put(state, user, path, body).await
}

/// DELETE /api/v1/:resource/:id
pub async fn delete(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.service(&resource, user)?.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser, JsonResult};

use super::body_record;

/// GET /api/v1/:resource - Filtered, sorted, paginated list
pub async fn get(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<Vec<Value>>, ApiError> {
    let (data, meta) = state.service(&resource, user)?.list(&params).await?;
    Ok(ApiResponse::paginated(data, meta))
}

/// POST /api/v1/:resource - Create a record
pub async fn post(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(resource): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> JsonResult {
    let service = state.service(&resource, user)?;
    let input = body_record(body)?;
    Ok(ApiResponse::created(service.create(input).await?))
}

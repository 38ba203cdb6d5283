use axum::{extract::Path, Extension};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, MessageResponse};

/// POST /api/v1/:resource/:id/:action - e.g. `events/1/like`
pub async fn post(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((resource, id, action)): Path<(String, String, String)>,
) -> Result<MessageResponse, ApiError> {
    let message = state.service(&resource, user)?.action(&id, &action).await?;
    Ok(MessageResponse(message))
}

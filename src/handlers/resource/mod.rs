pub mod action;
pub mod collection;
pub mod record;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::database::record::{from_body, Record};
use crate::error::ApiError;

// Re-export handler functions for use in routing
pub use action::post as action_post;
pub use collection::get as collection_get;
pub use collection::post as collection_post;
pub use record::delete as record_delete;
pub use record::get as record_get;
pub use record::patch as record_patch;
pub use record::put as record_put;

/// Request body as a record; malformed JSON is a 400
pub(crate) fn body_record(body: Result<Json<Value>, JsonRejection>) -> Result<Record, ApiError> {
    let Json(value) = body.map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    })?;
    Ok(from_body(value)?)
}

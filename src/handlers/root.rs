use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - Service info and the registered resources
pub async fn root(Extension(state): Extension<AppState>) -> Json<Value> {
    let resources: Vec<&str> = state.registry.names().collect();

    Json(json!({
        "data": {
            "name": "Agora API",
            "version": env!("CARGO_PKG_VERSION"),
            "store": state.store.name(),
            "resources": resources,
            "endpoints": {
                "list": "GET /api/v1/:resource",
                "create": "POST /api/v1/:resource",
                "show": "GET /api/v1/:resource/:id",
                "update": "PUT|PATCH /api/v1/:resource/:id",
                "delete": "DELETE /api/v1/:resource/:id",
                "action": "POST /api/v1/:resource/:id/:action",
            }
        }
    }))
}

/// GET /health - Store health
pub async fn health(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let now = crate::types::timestamp(chrono::Utc::now());

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": state.store.name(),
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "message": "Store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store": state.store.name(),
                    }
                })),
            )
        }
    }
}

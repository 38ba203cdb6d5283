use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Extension, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, ApiConfig, AppConfig};
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::{resource, root};
use crate::middleware::{jwt_auth_middleware, AuthUser};
use crate::observer::ObserverPipeline;
use crate::resource::ResourceRegistry;
use crate::services::ResourceService;

/// Shared, immutable request state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub registry: Arc<ResourceRegistry>,
    pub pipeline: Arc<ObserverPipeline>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, registry: ResourceRegistry) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            pipeline: Arc::new(ObserverPipeline::standard()),
        }
    }

    /// Service for a registered resource; unknown names are a 404
    pub fn service(&self, resource: &str, user: AuthUser) -> Result<ResourceService, ApiError> {
        let descriptor = self.registry.get(resource).ok_or_else(|| {
            tracing::debug!("Unknown resource '{}'", resource);
            ApiError::not_found("Resource not found")
        })?;
        Ok(ResourceService::new(descriptor, self.store.clone(), self.pipeline.clone(), user.id))
    }
}

pub fn app(state: AppState) -> Router {
    let config = config::config();

    let router = Router::new()
        // Public
        .route("/", get(root::root))
        .route("/health", get(root::health))
        // Protected
        .nest("/api/v1", api_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(config));

    request_logging(router, &config.api).layer(Extension(state))
}

/// HTTP trace spans, when `API_ENABLE_REQUEST_LOGGING` is on
fn request_logging(router: Router, api: &ApiConfig) -> Router {
    if api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn api_routes() -> Router {
    Router::new()
        .route(
            "/:resource",
            get(resource::collection_get).post(resource::collection_post),
        )
        .route(
            "/:resource/:id",
            get(resource::record_get)
                .put(resource::record_put)
                .patch(resource::record_patch)
                .delete(resource::record_delete),
        )
        .route("/:resource/:id/:action", post(resource::action_post))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    let methods = [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE];
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(origins).allow_methods(methods).allow_headers(Any)
    }
}

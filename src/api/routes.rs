use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::state::AppState;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.allowed_origins);

    Router::new()
        .route("/", get(handlers::root))
        // 靜態路徑優先於 /models/{year}
        .route("/models/range", get(handlers::get_models_for_range))
        .route("/models/discontinued", get(handlers::get_discontinued_models))
        .route("/models/statistics", get(handlers::get_models_statistics))
        .route("/models/{year}", get(handlers::get_models_for_year))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use super::handlers::{health_handler, root_handler, schedule_handler, AppState};
use crate::config::CorsPolicy;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn create_router(app_state: AppState) -> Router {
    let cors = match &app_state.config.cors {
        CorsPolicy::Any => CorsLayer::new().allow_origin(AllowOrigin::any()),
        CorsPolicy::Origins(origins) => {
            let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new().allow_origin(parsed).allow_credentials(true)
        }
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/schedule", post(schedule_handler))
        .layer(cors)
        .with_state(app_state)
}

//! HTTP transport for the scheduling core.
//!
//! Exposes `POST /api/schedule`, `GET /health`, and a root banner, wrapped
//! in CORS middleware configured from the environment (see [`config`]).

mod api;
mod config;

use api::{handlers::AppState, routes::create_router};
use config::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Arc::new(Config::from_env());
    let bind_addr = config.bind_addr;
    let app_state = AppState { config };

    let app = create_router(app_state);

    log::info!("listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

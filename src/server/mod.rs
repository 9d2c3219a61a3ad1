mod handlers;
mod state;
mod static_files;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::session::Session;

pub fn build_router(config: &Config) -> Router {
    let state = Arc::new(AppState {
        session: Session::new(),
        acquirer: config.acquirer(),
        resolver: config.resolver(),
    });

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .route("/api/location", post(handlers::locate))
        .route("/api/address", post(handlers::address))
        .route("/api/map", get(handlers::map))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, config: &Config) -> std::io::Result<()> {
    let app = build_router(config);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("onde listening on http://{}", addr);
    log::info!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::api::analysis as analysis_handlers;
use super::api::predict as predict_handlers;
use super::api::trajectory as trajectory_handlers;
use super::api_doc::ApiDoc;
use super::AppState;
use crate::config::Config;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/trajectory",
            post(trajectory_handlers::sample_trajectory),
        )
        .route("/api/analysis/metrics", post(analysis_handlers::metrics))
        .route(
            "/api/analysis/anomalies",
            post(analysis_handlers::anomalies),
        )
        .route(
            "/api/analysis/describe",
            post(analysis_handlers::describe_columns),
        )
        .route("/api/predict", post(predict_handlers::predict_trajectory))
        .route("/api-doc/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let app = router(AppState::new(config));

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

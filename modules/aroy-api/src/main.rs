use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use aroy_common::Config;
use aroy_core::Recommender;

mod rest;

pub struct AppState {
    pub recommender: Recommender,
    /// Deadline for one recommendation branch; the other branch keeps
    /// running when this one expires.
    pub branch_timeout: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("aroy_api=info".parse()?))
        .init();

    let config = Config::from_env();

    let gemini = Gemini::new(&config.gemini_api_key, &config.gemini_model);
    info!(model = %config.gemini_model, "Using Gemini model");

    let state = Arc::new(AppState {
        recommender: Recommender::new(Arc::new(gemini)),
        branch_timeout: Duration::from_secs(config.branch_timeout_secs),
    });

    let app = rest::router(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only (queries may contain free text)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Aroy API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

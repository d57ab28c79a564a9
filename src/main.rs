//! Tunisian Legal Assistant - chat front-end for the legal QA service
//!
//! Serves a conversation page that forwards questions, feedback and
//! reflection requests to the question-answering API.

mod api_client;
mod config;
mod session;
mod state_machine;
mod web;

use api_client::HttpApiClient;
use config::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legal_assistant=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();

    let client = HttpApiClient::new(&config.api_url, config.api_timeout)?;
    tracing::info!(
        api_url = %client.base_url(),
        timeout_secs = config.api_timeout.as_secs(),
        "Legal API client initialized"
    );

    let state = AppState::new(Arc::new(client));

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.ui_port));
    tracing::info!("Legal assistant listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

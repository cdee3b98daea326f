pub mod error;
pub mod handlers;
pub mod html;
pub mod view;

use crate::core::config::OutputFormat;
use crate::core::rates::RateTableProvider;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub rates: Arc<dyn RateTableProvider>,
    pub format: OutputFormat,
}

impl AppState {
    pub fn new(rates: Arc<dyn RateTableProvider>, format: OutputFormat) -> Self {
        Self { rates, format }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_rates))
        .route("/rate", get(handlers::rate))
        .route("/exchange", get(handlers::exchange))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let format = state.format;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, ?format, "Server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

use crate::core::config::OutputFormat;
use crate::core::feed::FeedError;
use crate::server::html;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures that are the service's fault rather than the caller's. The
/// details are logged and never sent to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl ApiError {
    pub fn render(self, format: OutputFormat) -> Response {
        error!(error = %self, "Request failed");
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        match format {
            OutputFormat::Json => {
                (status, Json(json!({ "error": "internal server error" }))).into_response()
            }
            OutputFormat::Html => match html::internal_error_page() {
                Ok(body) => (status, Html(body)).into_response(),
                Err(e) => {
                    error!(error = %e, "Failed to render error page");
                    status.into_response()
                }
            },
        }
    }
}

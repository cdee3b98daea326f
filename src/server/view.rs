//! What a request produced, independent of how it is rendered.

use crate::core::config::OutputFormat;
use crate::core::conversion::ValidationErrors;
use crate::core::rates::{RateEntry, RateTable};
use crate::server::error::ApiError;
use crate::server::html;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

#[derive(Debug)]
pub enum View {
    All(Arc<RateTable>),
    Rate {
        from: String,
        to: String,
        rate: f64,
    },
    Amount {
        from: String,
        to: String,
        amount: String,
        result: f64,
    },
    Error(ValidationErrors),
}

#[derive(Serialize)]
struct RateListing<'a> {
    date: Option<NaiveDate>,
    base: &'a str,
    rates: &'a [RateEntry],
}

impl View {
    /// Tag identifying which kind of result this is.
    pub fn status(&self) -> &'static str {
        match self {
            View::All(_) => "all",
            View::Rate { .. } => "rate",
            View::Amount { .. } => "amount",
            View::Error(_) => "error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            View::Error(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        }
    }

    pub fn render(self, format: OutputFormat) -> Response {
        let status = self.status_code();
        match format {
            OutputFormat::Html => match html::page(&self) {
                Ok(body) => (status, Html(body)).into_response(),
                Err(e) => ApiError::from(e).render(format),
            },
            OutputFormat::Json => (status, Json(self.to_json())).into_response(),
        }
    }

    /// JSON body: the listing, `{"rate": x}`, `{"amount": x}`, or one
    /// `field: message` pair per validation error.
    pub fn to_json(&self) -> Value {
        match self {
            View::All(table) => json!(RateListing {
                date: table.as_of(),
                base: table.base_currency(),
                rates: table.entries(),
            }),
            View::Rate { rate, .. } => json!({ "rate": rate }),
            View::Amount { result, .. } => json!({ "amount": result }),
            View::Error(errors) => {
                let fields: Map<String, Value> = errors
                    .iter()
                    .map(|e| (e.field().to_string(), Value::String(e.to_string())))
                    .collect();
                Value::Object(fields)
            }
        }
    }
}

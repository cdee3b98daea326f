//! Normalizes and parses the central bank daily rate feed.
//!
//! The feed is an XML document declared as windows-1251 with free-text
//! currency names and comma decimal separators. Names and the XML header are
//! stripped before parsing so that only ASCII structure and numbers remain,
//! then every comma in the document becomes a period.

use crate::core::rates::{RateEntry, RateTable};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static DECORATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\?.+\?>|<Name>\D+</Name>").expect("decoration pattern is valid")
});

const FEED_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to fetch rate feed: {0}")]
    Transport(String),
    #[error("Failed to parse rate feed document: {0}")]
    Document(String),
    #[error("Malformed rate '{value}' for currency {code}")]
    MalformedRate { code: String, value: String },
    #[error("Duplicate currency code in rate feed: {0}")]
    DuplicateCode(String),
}

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "@Date", default)]
    date: Option<String>,
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Removes the XML header and currency names, then turns every comma into a
/// period. The substitution is applied to the whole document.
pub fn normalize_document(raw: &str) -> String {
    DECORATION.replace_all(raw, "").replace(',', ".")
}

/// Parses an already normalized document into a rate table.
pub fn parse_document(document: &str, base_currency: &str) -> Result<RateTable, FeedError> {
    let feed: ValCurs =
        quick_xml::de::from_str(document).map_err(|e| FeedError::Document(e.to_string()))?;

    let mut entries = Vec::with_capacity(feed.valutes.len());
    for valute in feed.valutes {
        let rate = valute
            .value
            .parse::<f64>()
            .map_err(|_| FeedError::MalformedRate {
                code: valute.char_code.clone(),
                value: valute.value.clone(),
            })?;
        entries.push(RateEntry::new(valute.char_code, rate));
    }

    let as_of = feed.date.as_deref().and_then(|date| {
        NaiveDate::parse_from_str(date, FEED_DATE_FORMAT)
            .inspect_err(|e| debug!("Ignoring unparseable feed date '{}': {}", date, e))
            .ok()
    });

    debug!(count = entries.len(), ?as_of, "Parsed rate feed");
    RateTable::new(base_currency, entries, as_of)
}

/// Normalizes a raw feed body and parses it into a rate table.
pub fn parse_feed(raw: &str, base_currency: &str) -> Result<RateTable, FeedError> {
    parse_document(&normalize_document(raw), base_currency)
}

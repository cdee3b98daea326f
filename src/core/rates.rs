//! Rate table types and the provider abstraction

use crate::core::feed::FeedError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// A single currency and its value in units of the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub code: String,
    pub rate: f64,
}

impl RateEntry {
    pub fn new(code: impl Into<String>, rate: f64) -> Self {
        Self {
            code: code.into(),
            rate,
        }
    }
}

/// An immutable snapshot of every known rate, sorted by currency code.
///
/// The base currency is always present with a rate of exactly 1. Codes are
/// unique and every rate is finite and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base_currency: String,
    as_of: Option<NaiveDate>,
    entries: Vec<RateEntry>,
}

impl RateTable {
    /// Builds a table from feed entries, appending the base currency and
    /// sorting by code.
    pub fn new(
        base_currency: &str,
        entries: Vec<RateEntry>,
        as_of: Option<NaiveDate>,
    ) -> Result<Self, FeedError> {
        let mut seen = HashSet::with_capacity(entries.len() + 1);
        seen.insert(base_currency.to_string());

        for entry in &entries {
            if !entry.rate.is_finite() || entry.rate <= 0.0 {
                return Err(FeedError::MalformedRate {
                    code: entry.code.clone(),
                    value: entry.rate.to_string(),
                });
            }
            if !seen.insert(entry.code.clone()) {
                return Err(FeedError::DuplicateCode(entry.code.clone()));
            }
        }

        let mut entries = entries;
        entries.push(RateEntry::new(base_currency, 1.0));
        entries.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(Self {
            base_currency: base_currency.to_string(),
            as_of,
            entries,
        })
    }

    /// Returns the rate for `code`, or `None` when the table does not know it.
    pub fn lookup(&self, code: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.rate)
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Date the feed was published for, if it carried one.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source of rate tables. Implementations may fetch on every call or hand
/// out a shared snapshot.
#[async_trait]
pub trait RateTableProvider: Send + Sync {
    async fn fetch_table(&self) -> Result<Arc<RateTable>, FeedError>;
}

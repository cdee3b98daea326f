//! Pairwise rates and amount conversion on top of a [`RateTable`].
//!
//! Validation problems are collected rather than returned one at a time, so
//! a request with an unknown `from`, an unknown `to` and a bad amount reports
//! all three together.

use crate::core::rates::RateTable;
use std::fmt::Display;
use thiserror::Error;

/// Smallest amount accepted by [`convert`].
pub const MIN_AMOUNT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown currency")]
    UnknownCurrency(Side),
    #[error("invalid value")]
    InvalidAmount,
}

impl ValidationError {
    /// Name of the query field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UnknownCurrency(Side::From) => "from",
            ValidationError::UnknownCurrency(Side::To) => "to",
            ValidationError::InvalidAmount => "amount",
        }
    }
}

/// Every validation problem found for one request, in field order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field(), e))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn lookup_pair(
    table: &RateTable,
    from: &str,
    to: &str,
    errors: &mut ValidationErrors,
) -> Option<(f64, f64)> {
    let from_rate = table.lookup(from);
    let to_rate = table.lookup(to);
    if from_rate.is_none() {
        errors.push(ValidationError::UnknownCurrency(Side::From));
    }
    if to_rate.is_none() {
        errors.push(ValidationError::UnknownCurrency(Side::To));
    }
    from_rate.zip(to_rate)
}

/// Rate between two currencies, computed as `to_rate / from_rate`.
pub fn rate_between(table: &RateTable, from: &str, to: &str) -> Result<f64, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    match lookup_pair(table, from, to, &mut errors) {
        Some((from_rate, to_rate)) => Ok(to_rate / from_rate),
        None => Err(errors),
    }
}

/// Converts `amount` of `from` into `to`, computed as
/// `from_rate / to_rate * amount`.
///
/// Amounts below [`MIN_AMOUNT`] are rejected, as are NaN and infinities.
/// An amount so large that the result overflows is rejected too.
pub fn convert(
    table: &RateTable,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<f64, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let rates = lookup_pair(table, from, to, &mut errors);
    if !is_valid_amount(amount) {
        errors.push(ValidationError::InvalidAmount);
    }

    if let Some((from_rate, to_rate)) = rates.filter(|_| errors.is_empty()) {
        let result = from_rate / to_rate * amount;
        if result.is_finite() {
            return Ok(result);
        }
        errors.push(ValidationError::InvalidAmount);
    }
    Err(errors)
}

fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= MIN_AMOUNT
}

/// Parses an amount from query text. Missing or unparseable text, including
/// text padded with whitespace, yields `0.0`, which [`convert`] rejects.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|text| text.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Formats a computed value the way it is shown to people.
pub fn format_value(value: f64) -> String {
    format!("{value:.3}")
}

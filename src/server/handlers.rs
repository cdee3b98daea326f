use crate::core::conversion::{self, parse_amount};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::view::View;
use axum::{
    extract::{Query, State},
    response::Response,
};
use tracing::debug;

/// Query parameters accepted by `/rate` and `/exchange`.
#[derive(Debug, Default, PartialEq)]
pub struct ConversionQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Kept as text; anything unparseable is treated as an invalid amount.
    pub amount: Option<String>,
}

impl ConversionQuery {
    /// Picks the known keys out of raw query pairs. A repeated key keeps its
    /// first value and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut query.from,
                "to" => &mut query.to,
                "amount" => &mut query.amount,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

fn respond(state: &AppState, result: Result<View, ApiError>) -> Response {
    match result {
        Ok(view) => {
            debug!(status = view.status(), "Rendering response");
            view.render(state.format)
        }
        Err(e) => e.render(state.format),
    }
}

pub async fn list_rates(State(state): State<AppState>) -> Response {
    let result = state
        .rates
        .fetch_table()
        .await
        .map(View::All)
        .map_err(ApiError::from);
    respond(&state, result)
}

pub async fn rate(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = ConversionQuery::from_pairs(pairs);
    let result = async {
        let table = state.rates.fetch_table().await?;
        let from = query.from.unwrap_or_default();
        let to = query.to.unwrap_or_default();
        let view = match conversion::rate_between(&table, &from, &to) {
            Ok(rate) => View::Rate { from, to, rate },
            Err(errors) => View::Error(errors),
        };
        Ok::<_, ApiError>(view)
    }
    .await;
    respond(&state, result)
}

pub async fn exchange(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = ConversionQuery::from_pairs(pairs);
    let result = async {
        let table = state.rates.fetch_table().await?;
        let from = query.from.unwrap_or_default();
        let to = query.to.unwrap_or_default();
        let amount_text = query.amount.unwrap_or_default();
        let amount = parse_amount(Some(&amount_text));
        let view = match conversion::convert(&table, &from, &to, amount) {
            Ok(result) => View::Amount {
                from,
                to,
                amount: amount_text,
                result,
            },
            Err(errors) => View::Error(errors),
        };
        Ok::<_, ApiError>(view)
    }
    .await;
    respond(&state, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_value_wins_for_repeated_keys() {
        let query = ConversionQuery::from_pairs(pairs(&[
            ("from", "USD"),
            ("from", "EUR"),
            ("to", "RUB"),
            ("amount", "10"),
            ("amount", "20"),
        ]));
        assert_eq!(
            query,
            ConversionQuery {
                from: Some("USD".to_string()),
                to: Some("RUB".to_string()),
                amount: Some("10".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_and_missing_keys() {
        let query = ConversionQuery::from_pairs(pairs(&[("currency", "USD"), ("to", "")]));
        assert_eq!(
            query,
            ConversionQuery {
                from: None,
                to: Some(String::new()),
                amount: None,
            }
        );
    }
}

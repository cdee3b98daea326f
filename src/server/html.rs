//! HTML pages for the markup variant of the service.

use crate::core::conversion::format_value;
use crate::core::rates::RateEntry;
use crate::server::view::View;
use askama::Template;
use chrono::NaiveDate;

#[derive(Template)]
#[template(path = "rates.html")]
struct RatesPage<'a> {
    status: &'a str,
    as_of: Option<NaiveDate>,
    entries: &'a [RateEntry],
}

#[derive(Template)]
#[template(path = "result.html")]
struct ResultPage<'a> {
    status: &'a str,
    rows: Vec<(String, String)>,
}

#[derive(Template)]
#[template(path = "errors.html")]
struct ErrorsPage<'a> {
    status: &'a str,
    errors: Vec<(&'static str, String)>,
}

#[derive(Template)]
#[template(path = "internal_error.html")]
struct InternalErrorPage<'a> {
    status: &'a str,
}

fn direction(from: &str, to: &str) -> (String, String) {
    (format!("{from}  -->"), to.to_string())
}

/// Renders the full page for a view.
pub fn page(view: &View) -> askama::Result<String> {
    let status = view.status();
    match view {
        View::All(table) => RatesPage {
            status,
            as_of: table.as_of(),
            entries: table.entries(),
        }
        .render(),
        View::Rate { from, to, rate } => ResultPage {
            status,
            rows: vec![
                direction(from, to),
                ("amount".to_string(), format_value(*rate)),
            ],
        }
        .render(),
        View::Amount {
            from,
            to,
            amount,
            result,
        } => ResultPage {
            status,
            rows: vec![
                direction(from, to),
                ("amount".to_string(), amount.clone()),
                ("result".to_string(), format_value(*result)),
            ],
        }
        .render(),
        View::Error(errors) => ErrorsPage {
            status,
            errors: errors.iter().map(|e| (e.field(), e.to_string())).collect(),
        }
        .render(),
    }
}

pub fn internal_error_page() -> askama::Result<String> {
    InternalErrorPage { status: "error" }.render()
}

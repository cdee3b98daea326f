use super::ui;
use crate::core::conversion::{self, format_value, parse_amount};
use crate::core::rates::{RateTable, RateTableProvider};
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

impl RateTable {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate ({})", self.base_currency())),
        ]);

        for entry in self.entries() {
            let is_base = entry.code == self.base_currency();
            table.add_row(vec![
                Cell::new(&entry.code),
                ui::rate_cell(entry.rate, is_base),
            ]);
        }

        let title = match self.as_of() {
            Some(date) => format!("Exchange rates as of {date}"),
            None => "Exchange rates".to_string(),
        };

        format!(
            "{}\n\n{}\n\n{}",
            ui::style_text(&title, ui::StyleType::Title),
            table,
            ui::style_text(
                &format!("{} currencies", self.len()),
                ui::StyleType::Subtle
            )
        )
    }
}

fn print_errors(errors: &conversion::ValidationErrors) {
    for error in errors.iter() {
        eprintln!(
            "{} {}",
            ui::style_text(&format!("{}:", error.field()), ui::StyleType::Label),
            ui::style_text(&error.to_string(), ui::StyleType::Error)
        );
    }
}

/// Prints every known rate.
pub async fn run_rates(provider: &dyn RateTableProvider) -> Result<()> {
    let table = provider.fetch_table().await?;
    println!("{}", table.display_as_table());
    Ok(())
}

/// Prints the rate between two currencies.
pub async fn run_rate(provider: &dyn RateTableProvider, from: &str, to: &str) -> Result<()> {
    let table = provider.fetch_table().await?;
    match conversion::rate_between(&table, from, to) {
        Ok(rate) => {
            debug!(from, to, rate, "Computed rate");
            println!(
                "{} {}",
                ui::style_text(&format!("{from}  --> {to}"), ui::StyleType::Label),
                ui::style_text(&format_value(rate), ui::StyleType::Value)
            );
            Ok(())
        }
        Err(errors) => {
            print_errors(&errors);
            Err(errors.into())
        }
    }
}

/// Prints `amount` of `from` converted into `to`.
pub async fn run_convert(
    provider: &dyn RateTableProvider,
    from: &str,
    to: &str,
    amount: &str,
) -> Result<()> {
    let table = provider.fetch_table().await?;
    match conversion::convert(&table, from, to, parse_amount(Some(amount))) {
        Ok(result) => {
            debug!(from, to, amount, result, "Computed conversion");
            println!(
                "{} {}",
                ui::style_text(&format!("{amount} {from}  --> {to}"), ui::StyleType::Label),
                ui::style_text(&format_value(result), ui::StyleType::Value)
            );
            Ok(())
        }
        Err(errors) => {
            print_errors(&errors);
            Err(errors.into())
        }
    }
}

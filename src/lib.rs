pub mod cli;
pub mod core;
pub mod providers;
pub mod server;

use crate::core::config::{AppConfig, OutputFormat, RefreshPolicy};
use crate::providers::cbr::CbrProvider;
use anyhow::Result;
use tracing::{debug, info};

/// Overrides for the `server` section of the config.
#[derive(Debug, Default, Clone)]
pub struct ServeOptions {
    pub port: Option<u16>,
    pub format: Option<OutputFormat>,
    pub refresh: Option<RefreshPolicy>,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Serve(ServeOptions),
    Rates,
    Rate { from: String, to: String },
    Convert {
        from: String,
        to: String,
        amount: String,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

async fn serve(config: &AppConfig, options: ServeOptions) -> Result<()> {
    let port = options.port.unwrap_or(config.server.port);
    let format = options.format.unwrap_or(config.server.format);
    let refresh = options.refresh.unwrap_or(config.server.refresh);
    info!(port, ?format, ?refresh, "Starting rate server");

    let rates = providers::build_provider(config, refresh).await?;
    server::serve(server::AppState::new(rates, format), port).await
}

fn feed_provider(config: &AppConfig) -> Result<CbrProvider> {
    CbrProvider::new(&config.cbr(), &config.base_currency)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    match command {
        AppCommand::Serve(options) => serve(&config, options).await,
        AppCommand::Rates => cli::rates::run_rates(&feed_provider(&config)?).await,
        AppCommand::Rate { from, to } => {
            cli::rates::run_rate(&feed_provider(&config)?, &from, &to).await
        }
        AppCommand::Convert { from, to, amount } => {
            cli::rates::run_convert(&feed_provider(&config)?, &from, &to, &amount).await
        }
    }
}

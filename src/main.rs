use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kurs::core::config::{OutputFormat, RefreshPolicy};
use kurs::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Response format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// When to fetch the rate feed
        #[arg(short, long, value_enum)]
        refresh: Option<RefreshPolicy>,
    },
    /// Display all exchange rates
    Rates,
    /// Display the rate between two currencies
    Rate { from: String, to: String },
    /// Convert an amount between two currencies
    Convert {
        from: String,
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
}

impl From<Commands> for kurs::AppCommand {
    fn from(cmd: Commands) -> kurs::AppCommand {
        match cmd {
            Commands::Serve {
                port,
                format,
                refresh,
            } => kurs::AppCommand::Serve(kurs::ServeOptions {
                port,
                format,
                refresh,
            }),
            Commands::Rates => kurs::AppCommand::Rates,
            Commands::Rate { from, to } => kurs::AppCommand::Rate { from, to },
            Commands::Convert { from, to, amount } => {
                kurs::AppCommand::Convert { from, to, amount }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kurs::cli::setup::setup(),
        Some(cmd) => kurs::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

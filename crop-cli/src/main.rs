use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crop_cli::app::{self, CalculateArgs, Response};
use crop_cli::config::{AppConfig, Overrides};
use crop_cli::logging::init_logging;

/// Exit status used when a request is rejected.
const REJECTED_EXIT_CODE: u8 = 2;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Crop sale price calculator.
///
/// Works out the price per kilogram needed to cover production cost plus a
/// profit margin, compares it with the MSP and state market prices, and
/// suggests where to sell.
#[derive(Debug, Parser)]
#[command(name = "cropwise", version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./cropwise.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State price JSON file, overriding the config.
    #[arg(long, global = true)]
    state_prices: Option<PathBuf>,

    /// MSP CSV file, overriding the config and the built-in table.
    #[arg(long, global = true)]
    msp: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `info,crop_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a harvest given on the command line.
    Calculate(CalculateArgs),

    /// Answer a JSON request body read from FILE, or stdin when FILE is `-` or omitted.
    Request {
        file: Option<PathBuf>,
    },

    /// List crops with an MSP.
    Crops,

    /// List every state with market price data.
    States,
}

// ─── helpers ─────────────────────────────────────────────────────────────────

fn read_body(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request from '{}'", path.display())),
        _ => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;
            Ok(body)
        }
    }
}

fn print_response(response: &Response) -> ExitCode {
    println!("{}", response.body);
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(REJECTED_EXIT_CODE)
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.apply(Overrides {
        state_prices: cli.state_prices,
        msp: cli.msp,
        log_level: cli.log_level,
    });
    init_logging(&config.logging)?;
    debug!(?config, "resolved configuration");

    let calculator = app::build_calculator(&config)?;

    let code = match cli.command {
        Command::Calculate(args) => {
            info!(crop = %args.crop, state = ?args.state, "calculating");
            print_response(&app::respond(&calculator, &args.to_request_body())?)
        }
        Command::Request { file } => {
            let body = read_body(file.as_deref())?;
            print_response(&app::respond(&calculator, &body)?)
        }
        Command::Crops => {
            for crop in app::list_crops(&calculator) {
                println!("{crop}");
            }
            ExitCode::SUCCESS
        }
        Command::States => {
            for state in app::list_states(&calculator) {
                println!("{state}");
            }
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

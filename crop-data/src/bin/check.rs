use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crop_data::{CoverageReport, ReferenceSources, load_reference_data};
use tracing_subscriber::EnvFilter;

/// Validate reference data files before deploying them.
///
/// Loads the state price JSON (and an MSP CSV, if given) exactly the way the
/// calculator does, then reports how well the two tables cover each other.
#[derive(Parser, Debug)]
#[command(name = "crop-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the state price JSON file
    #[arg(short, long)]
    state_prices: PathBuf,

    /// Path to an MSP CSV file (uses the built-in table when omitted)
    #[arg(short, long)]
    msp: Option<PathBuf>,

    /// Exit with an error when a crop is missing from either table
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();
    let sources = ReferenceSources {
        state_prices: args.state_prices,
        msp: args.msp,
    };

    println!("Loading state prices from: {}", sources.state_prices.display());
    match &sources.msp {
        Some(path) => println!("Loading MSP table from: {}", path.display()),
        None => println!("Using built-in MSP table"),
    }

    let data = load_reference_data(&sources).context("Failed to load reference data")?;
    let report = CoverageReport::from_reference(&data);

    println!("Crops with MSP:          {}", report.msp_crops);
    println!("Crops with state prices: {}", report.priced_crops);
    println!("Distinct states:         {}", report.states);
    println!("Missing (null) prices:   {}", report.null_prices);

    for crop in &report.crops_without_prices {
        println!("  no state prices: {crop}");
    }
    for crop in &report.crops_without_msp {
        println!("  no MSP:          {crop}");
    }

    if args.strict && !report.is_complete() {
        bail!(
            "{} crop(s) missing state prices, {} crop(s) missing MSP",
            report.crops_without_prices.len(),
            report.crops_without_msp.len()
        );
    }

    println!("Reference data OK.");
    Ok(())
}

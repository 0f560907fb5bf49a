use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};

use liq_sync::engine::{MissingPolicy, UpdateSummary, Updater};
use liq_sync::market_data::adapters::liquidation_wtf::LiquidationWtfAdapter;
use liq_sync::persist::ensure_config_exists;
use liq_sync::settings::Settings;
use liq_sync::sync::run_update;
use liq_sync::telemetry;

/// Update liquidation values for the LHPControl GUI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to LHPC config file (usually called `varPairs.json`)
    #[arg(long, default_value = "varPairs.json")]
    config_file: PathBuf,

    /// Add a percentage to the liq value of each coin.
    /// e.g: add percentage = 10, liq value = 1000, coin liq value will be set at 1100
    #[arg(long = "add-liq-percentage", default_value_t = 0.0, allow_negative_numbers = true)]
    liq_percentage: f64,

    /// What to do with coins that have no liquidation value
    #[arg(long, value_enum, default_value_t = MissingPolicy::Keep)]
    on_missing: MissingPolicy,

    /// Settings file overriding the API url and request timeout
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Give additional debug output
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let args = Args::parse();
    telemetry::init_tracing(args.debug);
    debug!(?args, "Parsed arguments");

    let settings = Settings::load(args.settings.as_deref()).context("failed to load settings")?;
    debug!(?settings, "Loaded settings");

    // A missing config file aborts before anything is fetched
    ensure_config_exists(&args.config_file)?;

    info!("======= Starting to update the coins =======");
    let updater = Updater::new(args.liq_percentage, args.on_missing);

    match update(&settings, &args.config_file, &updater).await {
        Ok(summary) => {
            info!(
                updated = summary.updated(),
                kept = summary.kept(),
                placeholders = summary.placeholders(),
                missing = summary.missing(),
                "Coins processed"
            );
            if summary.missing() > 0 {
                info!("No liquidation value for: {}", summary.missing_symbols().join(", "));
            }
            info!("======= Update done =======");
        }
        Err(e) => {
            error!("Unexpected error while running the update: {:?}", e);
            info!("======= Update failed =======");
        }
    }

    Ok(())
}

async fn update(settings: &Settings, config_file: &Path, updater: &Updater) -> anyhow::Result<UpdateSummary> {
    let source = LiquidationWtfAdapter::from_settings(settings)?;
    run_update(&source, config_file, updater).await
}

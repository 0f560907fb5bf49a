// Runner: fetch -> load -> merge -> save
use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::engine::types::UpdateSummary;
use crate::engine::updater::Updater;
use crate::market_data::adapters::LiquidationSource;
use crate::persist::{load_config_file, save_config_file};

/// One full update of `config_file`.
///
/// Liquidation data is fetched before the file is read, so a failed fetch never touches it.
pub async fn run_update(
    source: &dyn LiquidationSource,
    config_file: &Path,
    updater: &Updater,
) -> anyhow::Result<UpdateSummary> {
    let snapshot = source
        .fetch_liquidations()
        .await
        .context("failed to fetch liquidation data")?;
    if snapshot.is_empty() {
        warn!("Liquidation API returned no records, no coin will be updated");
    } else {
        info!(records = snapshot.len(), "Fetched liquidation data");
    }

    let mut document = load_config_file(config_file)
        .with_context(|| format!("failed to load {}", config_file.display()))?;

    let summary = updater.apply(&mut document, &snapshot);

    save_config_file(&document, config_file)
        .with_context(|| format!("failed to save {}", config_file.display()))?;

    Ok(summary)
}

// Shared trait + error for liquidation data sources

use crate::market_data::snapshot::LiquidationSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to liquidation API failed")]
    Request(#[from] reqwest::Error),
    #[error("liquidation API returned {status} for {url}")]
    Status { status: reqwest::StatusCode, url: String },
    #[error("could not decode liquidation API response")]
    Decode(#[from] serde_json::Error),
}

#[async_trait::async_trait]
pub trait LiquidationSource: Send + Sync {
    // One fetch per run; the snapshot is handed down the pipeline by value.
    async fn fetch_liquidations(&self) -> Result<LiquidationSnapshot, FetchError>;
}

// Make the liquidation.wtf adapter visible
pub mod liquidation_wtf;
pub mod liquidation_wtf_types;

// liquidation.wtf REST adapter

use std::time::Duration;

use tracing::{debug, instrument, trace};

use super::liquidation_wtf_types::ByCoinResponse;
use super::{FetchError, LiquidationSource};
use crate::market_data::snapshot::LiquidationSnapshot;
use crate::settings::Settings;

pub const BY_COIN_URL: &str = "https://liquidation.wtf/api/v0/liquidations/by_coin";

#[derive(Debug)]
pub struct LiquidationWtfAdapter {
    pub url: String, // "https://liquidation.wtf/api/v0/liquidations/by_coin"
    client: reqwest::Client,
}

impl LiquidationWtfAdapter {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url: url.to_string(), client })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(&settings.api_url, settings.request_timeout())
    }
}

#[async_trait::async_trait]
impl LiquidationSource for LiquidationWtfAdapter {
    #[instrument(skip_all)]
    async fn fetch_liquidations(&self) -> Result<LiquidationSnapshot, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        debug!(url = %self.url, %status, "Liquidation API responded");

        if !status.is_success() {
            return Err(FetchError::Status { status, url: self.url.clone() });
        }

        let body = response.text().await?;
        trace!(body = %body, "Liquidation API body");

        let payload: ByCoinResponse = serde_json::from_str(&body)?;
        debug!(records = payload.data.len(), "Decoded liquidation records");
        Ok(LiquidationSnapshot::new(payload.data))
    }
}

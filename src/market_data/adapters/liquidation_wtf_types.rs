// Source: https://liquidation.wtf/api/v0/liquidations/by_coin
use serde::Deserialize;

// Wrapper for the whole response body
#[derive(Debug, Deserialize)]
pub struct ByCoinResponse {
    pub data: Vec<LiquidationRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiquidationRecord {
    pub symbol: String, // e.g. "BTC"
    #[serde(default)]
    pub average_usdt: Option<f64>, // null for coins without recent liquidations
    // we ignore the other fields for now
}

impl LiquidationRecord {
    pub fn new(symbol: &str, average_usdt: f64) -> Self {
        Self { symbol: symbol.to_string(), average_usdt: Some(average_usdt) }
    }
}

use crate::market_data::adapters::liquidation_wtf_types::LiquidationRecord;

// Liquidation records fetched for a single run, in the order the API sent them
#[derive(Debug, Clone, Default)]
pub struct LiquidationSnapshot {
    records: Vec<LiquidationRecord>,
}

impl LiquidationSnapshot {
    pub fn new(records: Vec<LiquidationRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Average liquidation value in USDT for `symbol`.
    ///
    /// Symbols are compared by exact equality and the first matching record wins.
    /// A matching record without an average counts as no value.
    pub fn average_usdt(&self, symbol: &str) -> Option<f64> {
        self.records
            .iter()
            .find(|record| record.symbol == symbol)
            .and_then(|record| record.average_usdt)
    }
}

impl From<Vec<LiquidationRecord>> for LiquidationSnapshot {
    fn from(records: Vec<LiquidationRecord>) -> Self {
        Self::new(records)
    }
}

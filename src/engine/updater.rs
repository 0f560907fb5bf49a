use tracing::{debug, info, instrument, warn};

use crate::engine::types::{CoinUpdate, MissingPolicy, PercentChange, UpdateSummary};
use crate::market_data::snapshot::LiquidationSnapshot;
use crate::persist::types::{CoinEntry, ConfigDocument, PLACEHOLDER_LICKVALUE};

/// Rewrites each coin's lickvalue from a liquidation snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Updater {
    pub liq_percentage: f64,
    pub missing_policy: MissingPolicy,
}

impl Updater {
    pub fn new(liq_percentage: f64, missing_policy: MissingPolicy) -> Self {
        if liq_percentage < 0.0 {
            warn!(liq_percentage, "Negative liquidation percentage is ignored");
        }
        Self { liq_percentage, missing_policy }
    }

    #[instrument(level = "debug", skip_all, fields(coins = document.coins.len(), records = snapshot.len()))]
    pub fn apply(&self, document: &mut ConfigDocument, snapshot: &LiquidationSnapshot) -> UpdateSummary {
        let updates = document
            .coins
            .iter_mut()
            .map(|coin| self.update_coin(coin, snapshot))
            .collect();
        UpdateSummary { updates }
    }

    fn update_coin(&self, coin: &mut CoinEntry, snapshot: &LiquidationSnapshot) -> CoinUpdate {
        debug!(symbol = %coin.symbol, "Looking up average_usdt");
        let Some(average) = snapshot.average_usdt(&coin.symbol) else {
            return self.handle_missing(coin);
        };

        let current = round_lickvalue(apply_markup(average, self.liq_percentage));
        let change = match coin.lickvalue_f64() {
            Some(previous) => percent_change(previous, current),
            None => {
                warn!(symbol = %coin.symbol, lickvalue = %coin.lickvalue, "Previous value is not a number");
                PercentChange::Undefined
            }
        };

        let rendered = format_lickvalue(current);
        info!("{} \t {} \t -> \t {} ({})", coin.symbol, coin.lickvalue, rendered, change);
        let previous = std::mem::replace(&mut coin.lickvalue, rendered);
        CoinUpdate::Updated { symbol: coin.symbol.clone(), previous, current, change }
    }

    fn handle_missing(&self, coin: &mut CoinEntry) -> CoinUpdate {
        match self.missing_policy {
            MissingPolicy::Keep => {
                warn!(
                    "{} has not been updated, no liquidation value found. Old value is kept",
                    coin.symbol
                );
                CoinUpdate::Kept { symbol: coin.symbol.clone() }
            }
            MissingPolicy::Placeholder => {
                warn!("{} has not been updated, no liquidation value found", coin.symbol);
                info!("{} \t {} \t -> \t {}", coin.symbol, coin.lickvalue, PLACEHOLDER_LICKVALUE);
                let previous =
                    std::mem::replace(&mut coin.lickvalue, PLACEHOLDER_LICKVALUE.to_string());
                CoinUpdate::Placeholder { symbol: coin.symbol.clone(), previous }
            }
        }
    }
}

/// Add `liq_percentage` percent on top of `value`. Zero or negative percentages leave it as is.
pub fn apply_markup(value: f64, liq_percentage: f64) -> f64 {
    if liq_percentage > 0.0 {
        value + value * liq_percentage / 100.0
    } else {
        value
    }
}

/// Nearest integer, halves go to the even neighbour.
///
/// Stays an `f64` so values past the `i64` range are not clamped.
pub fn round_lickvalue(value: f64) -> f64 {
    // + 0.0 turns -0.0 into 0.0
    value.round_ties_even() + 0.0
}

/// Integer digits of a rounded lickvalue, e.g. `165` or `100000000000000000000`.
pub fn format_lickvalue(value: f64) -> String {
    format!("{:.0}", value)
}

pub fn percent_change(previous: f64, current: f64) -> PercentChange {
    if current == previous {
        return PercentChange::Unchanged;
    }
    if previous == 0.0 {
        return PercentChange::Undefined;
    }
    let magnitude = round_to_hundredths((current - previous).abs() / previous * 100.0);
    PercentChange::Moved { increased: current >= previous, magnitude }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::adapters::liquidation_wtf_types::LiquidationRecord;
    use proptest::prelude::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    // In-memory sink for the fmt subscriber
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn line_with<'a>(logs: &'a str, needle: &str) -> &'a str {
        logs.lines()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no log line contains {:?} in:\n{}", needle, logs))
    }

    fn snapshot(records: &[(&str, f64)]) -> LiquidationSnapshot {
        records.iter().map(|(s, v)| LiquidationRecord::new(s, *v)).collect::<Vec<_>>().into()
    }

    fn document(coins: &[(&str, &str)]) -> ConfigDocument {
        ConfigDocument::new(coins.iter().map(|(s, v)| CoinEntry::new(s, v)).collect())
    }

    #[test]
    fn test_markup_applied_then_rounded() {
        let mut doc = document(&[("BTC", "100")]);
        let summary = Updater::new(10.0, MissingPolicy::Keep).apply(&mut doc, &snapshot(&[("BTC", 150.0)]));

        assert_eq!(doc.coins[0].lickvalue, "165");
        match &summary.updates[0] {
            CoinUpdate::Updated { previous, current, change, .. } => {
                assert_eq!(previous, "100");
                assert_eq!(*current, 165.0);
                assert_eq!(change.to_string(), "+65.0%");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_no_markup_rounds_average() {
        let mut doc = document(&[("BTC", "42000"), ("ETH", "2000")]);
        Updater::default().apply(&mut doc, &snapshot(&[("ETH", 1800.4), ("BTC", 42000.6)]));

        assert_eq!(doc.coins[0].lickvalue, "42001");
        assert_eq!(doc.coins[1].lickvalue, "1800");
    }

    #[test]
    fn test_rounding_ties_to_even() {
        assert_eq!(round_lickvalue(2.5), 2.0);
        assert_eq!(round_lickvalue(3.5), 4.0);
        assert_eq!(round_lickvalue(1000.49), 1000.0);
        assert_eq!(format_lickvalue(round_lickvalue(-0.3)), "0");
    }

    #[test]
    fn test_negative_markup_ignored() {
        assert_eq!(apply_markup(1000.0, -10.0), 1000.0);
        assert_eq!(apply_markup(1000.0, 0.0), 1000.0);
        assert_eq!(apply_markup(1000.0, 10.0), 1100.0);
    }

    #[test]
    fn test_missing_symbol_keeps_old_value() {
        let mut doc = document(&[("XYZ", "50")]);
        let summary = Updater::new(5.0, MissingPolicy::Keep).apply(&mut doc, &snapshot(&[("BTC", 150.0)]));

        assert_eq!(doc.coins[0].lickvalue, "50");
        assert_eq!(summary.updates, vec![CoinUpdate::Kept { symbol: "XYZ".into() }]);
    }

    #[test]
    fn test_missing_symbol_placeholder() {
        let mut doc = document(&[("XYZ", "50"), ("BTC", "100")]);
        let summary = Updater::new(0.0, MissingPolicy::Placeholder).apply(&mut doc, &snapshot(&[("BTC", 100.0)]));

        assert_eq!(doc.coins[0].lickvalue, PLACEHOLDER_LICKVALUE);
        assert_eq!(doc.coins[1].lickvalue, "100");
        assert_eq!(summary.placeholders(), 1);
        assert_eq!(summary.updated(), 1);
        assert!(matches!(
            &summary.updates[1],
            CoinUpdate::Updated { change: PercentChange::Unchanged, .. }
        ));
    }

    #[test]
    fn test_non_numeric_previous_value_still_updated() {
        let mut doc = document(&[("BTC", PLACEHOLDER_LICKVALUE)]);
        let summary = Updater::default().apply(&mut doc, &snapshot(&[("BTC", 99.0)]));

        assert_eq!(doc.coins[0].lickvalue, "99");
        assert!(matches!(
            &summary.updates[0],
            CoinUpdate::Updated { change: PercentChange::Undefined, .. }
        ));
    }

    #[test]
    fn test_huge_average_not_clamped() {
        let mut doc = document(&[("BTC", "100")]);
        Updater::default().apply(&mut doc, &snapshot(&[("BTC", 1e20)]));

        assert_eq!(doc.coins[0].lickvalue, "100000000000000000000");
    }

    #[test]
    fn test_logs_when_symbol_kept() {
        let mut doc = document(&[("XYZ", "50"), ("BTC", "100")]);
        let logs = capture_logs(|| {
            Updater::new(10.0, MissingPolicy::Keep).apply(&mut doc, &snapshot(&[("BTC", 150.0)]));
        });

        let warning = line_with(&logs, "XYZ has not been updated, no liquidation value found. Old value is kept");
        assert!(warning.contains("WARN"), "{}", warning);
        let change = line_with(&logs, "BTC \t 100 \t -> \t 165 (+65.0%)");
        assert!(change.contains("INFO"), "{}", change);
        assert!(!logs.contains("XYZ \t 50"));
    }

    #[test]
    fn test_logs_when_symbol_replaced_by_placeholder() {
        let mut doc = document(&[("XYZ", "50")]);
        let logs = capture_logs(|| {
            Updater::new(0.0, MissingPolicy::Placeholder).apply(&mut doc, &snapshot(&[]));
        });

        let warning = line_with(&logs, "XYZ has not been updated, no liquidation value found");
        assert!(warning.contains("WARN"), "{}", warning);
        assert!(!warning.contains("Old value is kept"));
        let change = line_with(&logs, "XYZ \t 50 \t -> \t None");
        assert!(change.contains("INFO"), "{}", change);
    }

    #[test]
    fn test_percent_change_cases() {
        assert_eq!(percent_change(100.0, 100.0), PercentChange::Unchanged);
        assert_eq!(percent_change(0.0, 100.0), PercentChange::Undefined);
        assert_eq!(percent_change(0.0, 0.0), PercentChange::Unchanged);
        assert_eq!(
            percent_change(200.0, 150.0),
            PercentChange::Moved { increased: false, magnitude: 25.0 }
        );
        assert_eq!(percent_change(3.0, 4.0).to_string(), "+33.33%");
        assert_eq!(percent_change(3.0, 2.0).to_string(), "-33.33%");
    }

    #[test]
    fn test_extra_keys_survive_update() {
        let mut doc: ConfigDocument = serde_json::from_str(
            r#"{"coins":[{"symbol":"BTC","lickvalue":"1","leverage":20}],"lang":"en"}"#,
        )
        .unwrap();
        Updater::default().apply(&mut doc, &snapshot(&[("BTC", 7.0)]));

        assert_eq!(doc.coins[0].lickvalue, "7");
        assert_eq!(doc.coins[0].extra.get("leverage"), Some(&serde_json::json!(20)));
        assert_eq!(doc.extra.get("lang"), Some(&serde_json::json!("en")));
    }

    proptest! {
        #[test]
        fn prop_no_markup_stores_rounded_average(average in 0.0f64..1e9) {
            let mut doc = document(&[("BTC", "1")]);
            Updater::default().apply(&mut doc, &snapshot(&[("BTC", average)]));
            prop_assert_eq!(&doc.coins[0].lickvalue, &format!("{:.0}", average.round_ties_even()));
        }

        #[test]
        fn prop_markup_stays_within_half_unit(average in 1.0f64..1e7, pct in 0.01f64..500.0) {
            let mut doc = document(&[("BTC", "1")]);
            Updater::new(pct, MissingPolicy::Keep).apply(&mut doc, &snapshot(&[("BTC", average)]));
            let written: f64 = doc.coins[0].lickvalue.parse().unwrap();
            let exact = average * (1.0 + pct / 100.0);
            prop_assert!((written - exact).abs() <= 0.5 + 1e-6, "written {} exact {}", written, exact);
        }

        #[test]
        fn prop_percent_change_sign_and_magnitude(previous in 1i64..1_000_000, current in 0i64..1_000_000) {
            prop_assume!(previous != current);
            match percent_change(previous as f64, current as f64) {
                PercentChange::Moved { increased, magnitude } => {
                    prop_assert_eq!(increased, current >= previous);
                    let exact = (current - previous).abs() as f64 / previous as f64 * 100.0;
                    prop_assert!((magnitude - exact).abs() <= 0.005 + 1e-9);
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}

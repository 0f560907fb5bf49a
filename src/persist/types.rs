use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("config file does not exist at path {}", .0.display())]
    Missing(PathBuf),
    #[error("could not access config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not load config file data")]
    InvalidDocument(#[source] serde_json::Error),
    #[error("could not encode config document")]
    Encode(#[source] serde_json::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Literal written by the legacy LHPC script when no liquidation value was found.
pub const PLACEHOLDER_LICKVALUE: &str = "None";

/// One tracked coin. Keys other than `symbol` and `lickvalue` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinEntry {
    pub symbol: String,
    pub lickvalue: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CoinEntry {
    pub fn new(symbol: &str, lickvalue: &str) -> Self {
        Self { symbol: symbol.to_string(), lickvalue: lickvalue.to_string(), extra: Map::new() }
    }

    /// The stored value as a number, `None` for placeholders or anything non-numeric.
    pub fn lickvalue_f64(&self) -> Option<f64> {
        self.lickvalue.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// The whole `varPairs.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub coins: Vec<CoinEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    pub fn new(coins: Vec<CoinEntry>) -> Self {
        Self { coins, extra: Map::new() }
    }
}

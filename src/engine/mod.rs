pub mod types;
pub mod updater;

pub use types::{CoinUpdate, MissingPolicy, PercentChange, UpdateSummary};
pub use updater::Updater;

// Market data module entrypoint
pub mod adapters;  // venue-specific fetchers (liquidation.wtf)
pub mod snapshot;  // in-memory liquidation records for one run

pub use adapters::{FetchError, LiquidationSource};
pub use snapshot::LiquidationSnapshot;

pub mod types;
pub use types::*;
pub mod store;
pub use store::{ensure_config_exists, load_config_file, save_config_file};

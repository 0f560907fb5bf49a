//! Runtime settings for the liquidation fetcher.
//!
//! Layered with the `config` crate, later sources win:
//! built-in defaults, then an optional settings file, then `LIQSYNC_*` environment variables.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::market_data::adapters::liquidation_wtf::BY_COIN_URL;

pub const ENV_PREFIX: &str = "LIQSYNC";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::layered(file, Some(Environment::with_prefix(ENV_PREFIX).try_parsing(true)))
    }

    fn layered(file: Option<&Path>, env: Option<Environment>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api_url", BY_COIN_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        builder.build()?.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

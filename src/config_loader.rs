use anyhow::{anyhow, Result};
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::constants::{
    DEFAULT_INSTRUMENT_ID, DEFAULT_ORDER_QUANTITY, DEFAULT_TICK_SIZE,
};

/// Top-level configuration structure containing all config sections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub instrument: InstrumentConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

/// The instrument being quoted
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentConfig {
    #[serde(default = "default_instrument_id")]
    pub instrument_id: u64,

    #[serde(default = "default_tick_size")]
    pub tick_size: Decimal,

    /// Unsigned size of each resting quote; the side supplies the sign.
    #[serde(default = "default_order_quantity")]
    pub order_quantity: Decimal,
}

fn default_instrument_id() -> u64 {
    DEFAULT_INSTRUMENT_ID
}

fn default_tick_size() -> Decimal {
    DEFAULT_TICK_SIZE
}

fn default_order_quantity() -> Decimal {
    DEFAULT_ORDER_QUANTITY
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            instrument_id: DEFAULT_INSTRUMENT_ID,
            tick_size: DEFAULT_TICK_SIZE,
            order_quantity: DEFAULT_ORDER_QUANTITY,
        }
    }
}

/// Synthetic book feed driven by the demo binary
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_start_price")]
    pub start_price: Decimal,

    #[serde(default = "default_level_quantity")]
    pub level_quantity: Decimal,

    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
}

fn default_start_price() -> Decimal {
    dec!(100.00000)
}

fn default_level_quantity() -> Decimal {
    dec!(5)
}

fn default_update_interval_ms() -> u64 {
    500
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            start_price: default_start_price(),
            level_quantity: default_level_quantity(),
            update_interval_ms: default_update_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Read the file
        let config_str = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        // Parse the TOML
        let config: AppConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        info!("Loaded configuration from {}", path.display());
        debug!(
            "Quoting instrument {} with tick size {}",
            config.instrument.instrument_id, config.instrument.tick_size
        );

        Ok(config)
    }
}

use std::error::Error;

use serde::{Deserialize, Serialize};

use plantsync_server::configs::{Backend, Logger};

/// Fleet parameters for the generator loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mock {
    #[serde(default = "default_device_count")]
    pub device_count: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Hours of back-dated readings produced at startup; zero disables it.
    #[serde(default)]
    pub backfill_hours: u32,
    #[serde(default = "default_backfill_interval")]
    pub backfill_interval_minutes: u32,
}

/// Generator settings, read from the shared workspace config file. Sections
/// belonging to the gateway are ignored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub mock: Mock,
    #[serde(default)]
    pub backend: Option<Backend>,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let settings: Settings = toml::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/default.toml"
        )))?;

        Ok(settings)
    }
}

fn default_device_count() -> u32 {
    1
}

fn default_interval_secs() -> u64 {
    30
}

fn default_backfill_interval() -> u32 {
    5
}

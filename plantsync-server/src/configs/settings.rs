use std::error::Error;
use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redis {
    pub url: String,
    #[serde(default = "default_control_channel")]
    pub channel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backend {
    pub url: String,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    pub url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Gateway settings. The `redis`, `backend` and `advisory` sections are
/// optional; a missing section disables the corresponding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    #[serde(default)]
    pub redis: Option<Redis>,
    #[serde(default)]
    pub backend: Option<Backend>,
    #[serde(default)]
    pub advisory: Option<Advisory>,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let path = env::var("PLANTSYNC_CONFIG")
            .unwrap_or_else(|_| String::from("configs/default.toml"));

        Self::from_file(Path::new(&path))
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;

        Ok(toml::from_str(&raw)?)
    }
}

fn default_control_channel() -> String {
    String::from("device_control_channel")
}

fn default_backend_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_default_to_none() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8000

            [logger]
            level = "debug"
            "#,
        )
        .unwrap();

        assert!(settings.redis.is_none());
        assert!(settings.backend.is_none());
        assert!(settings.advisory.is_none());
    }

    #[test]
    fn redis_channel_has_a_default() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8000

            [logger]
            level = "info"

            [redis]
            url = "redis://127.0.0.1:6379"
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.redis.unwrap().channel,
            "device_control_channel"
        );
    }
}

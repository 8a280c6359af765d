use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "assets/price_model.json";
pub const DEFAULT_DEMO_PATH: &str = "assets/demo_data.csv";

/// Process configuration. Only the listen address comes from the environment;
/// the artifact paths are fixed relative to the working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub demo_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            demo_path: PathBuf::from(DEFAULT_DEMO_PATH),
        }
    }
}

impl Config {
    /// Read `HOST` and `PORT` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            config.port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar {
                    name: "PORT",
                    value: port.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(config)
    }

    /// `host:port` string handed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        // Bare IPv6 literals need brackets.
        if self.host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

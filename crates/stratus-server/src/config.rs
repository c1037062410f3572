use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::warn;

use stratus_weather::WeatherConfig;
use stratus_weather::config::{
    DEFAULT_API_URL, DEFAULT_GEOCODE_URL, DEFAULT_HISTORY_URL, DEFAULT_TIMEOUT_SECS,
};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub weather: WeatherConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = var("STRATUS_JWT_SECRET").unwrap_or_else(|| {
            warn!("STRATUS_JWT_SECRET is unset, using the development secret");
            DEV_JWT_SECRET.to_string()
        });

        let api_key = var("WEATHER_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("WEATHER_API_KEY must be set");
        }

        let port: u16 = or("STRATUS_PORT", "5000")
            .parse()
            .context("STRATUS_PORT is not a valid port")?;

        let timeout_secs: u64 = var("WEATHER_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("WEATHER_TIMEOUT_SECS is not a number")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            host: or("STRATUS_HOST", "0.0.0.0"),
            port,
            data_dir: or("STRATUS_DATA_DIR", "data").into(),
            jwt_secret,
            weather: WeatherConfig {
                api_key,
                api_url: or("WEATHER_API_URL", DEFAULT_API_URL),
                history_url: or("WEATHER_HISTORY_URL", DEFAULT_HISTORY_URL),
                geocode_url: or("WEATHER_GEOCODE_URL", DEFAULT_GEOCODE_URL),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

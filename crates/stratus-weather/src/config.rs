use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://api.openweathermap.org/data/2.5";
pub const DEFAULT_HISTORY_URL: &str = "http://history.openweathermap.org/data/2.5/history/city";
pub const DEFAULT_GEOCODE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Provider endpoints and credentials.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    /// Base for `/weather` and `/forecast`.
    pub api_url: String,
    pub history_url: String,
    pub geocode_url: String,
    pub timeout: Duration,
}

impl WeatherConfig {
    /// Config pointing at the public provider endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Config whose endpoints all live under one base URL, as a mock server provides.
    pub fn with_base_url(api_key: impl Into<String>, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            api_url: base.to_string(),
            history_url: format!("{base}/history/city"),
            geocode_url: format!("{base}/geo/1.0/direct"),
            ..Self::new(api_key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_layout() {
        let config = WeatherConfig::with_base_url("k", "http://127.0.0.1:9000/");
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.history_url, "http://127.0.0.1:9000/history/city");
        assert_eq!(config.geocode_url, "http://127.0.0.1:9000/geo/1.0/direct");
        assert_eq!(config.api_key, "k");
    }
}

/// Message for a current-weather request with neither a location nor coordinates.
pub const LOCATION_REQUIRED: &str = "Location or coordinates are required";

/// Message for any non-success answer from the current-weather endpoint.
pub const INVALID_LOCATION: &str = "Invalid location or no data available";

/// Client-facing message for transport and decode failures. Their detail
/// stays in the logs.
pub const PROVIDER_UNAVAILABLE: &str = "Weather provider unavailable";

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Unreadable provider response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl WeatherError {
    /// Request URLs carry the API key, so they are dropped from the wrapped
    /// error before it can be displayed.
    pub fn transport(e: reqwest::Error) -> Self {
        WeatherError::Transport(e.without_url())
    }

    pub fn decode(e: reqwest::Error) -> Self {
        WeatherError::Decode(e.without_url())
    }

    /// Text safe to hand to an HTTP client.
    pub fn public_message(&self) -> String {
        match self {
            WeatherError::Validation(msg) | WeatherError::Upstream(msg) => msg.clone(),
            WeatherError::Transport(_) | WeatherError::Decode(_) => PROVIDER_UNAVAILABLE.to_string(),
        }
    }
}

//! Weather lookups against an OpenWeatherMap-compatible provider.
//!
//! Current weather is recorded in the caller's history; forecast and
//! historical lookups have no side effects.

pub mod config;
pub mod error;
pub mod service;
mod types;

pub use config::WeatherConfig;
pub use error::WeatherError;
pub use service::WeatherService;

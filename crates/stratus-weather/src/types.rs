use serde::Deserialize;
use serde_json::{Value, json};

/// Geocoding returned no candidates.
pub const NO_DATA: &str = "No data available";
/// The first geocoding candidate had no coordinates.
pub const NO_COORDINATES: &str = "Invalid location";
/// None of the five daily history queries produced data.
pub const NO_HISTORY: &str = "No historical data available";

/// Placeholder history entry carrying only a description.
pub fn sentinel(description: &str) -> Value {
    json!({
        "dt": null,
        "temp": null,
        "weather": [{ "description": description }],
    })
}

/// The slice of a current-weather payload recorded in history.
#[derive(Debug, Deserialize)]
struct CurrentPayload {
    name: String,
    sys: Sys,
    main: Main,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub description: String,
}

impl Observation {
    /// `None` when the payload lacks any of name, country, temperature or description.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let parsed = CurrentPayload::deserialize(payload).ok()?;
        let condition = parsed.weather.into_iter().next()?;
        Some(Self {
            city: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp,
            description: condition.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_from_full_payload() {
        let payload = json!({
            "cod": 200,
            "name": "Prague",
            "sys": { "country": "CZ" },
            "main": { "temp": 15, "humidity": 40 },
            "weather": [{ "description": "clear sky" }, { "description": "mist" }],
        });

        let obs = Observation::from_payload(&payload).unwrap();
        assert_eq!(obs.city, "Prague");
        assert_eq!(obs.country, "CZ");
        assert_eq!(obs.temperature, 15.0);
        assert_eq!(obs.description, "clear sky");
    }

    #[test]
    fn observation_needs_a_condition() {
        let payload = json!({
            "name": "Prague",
            "sys": { "country": "CZ" },
            "main": { "temp": 15.0 },
            "weather": [],
        });
        assert!(Observation::from_payload(&payload).is_none());
    }

    #[test]
    fn sentinel_shape() {
        let value = sentinel(NO_DATA);
        assert!(value["dt"].is_null());
        assert!(value["temp"].is_null());
        assert_eq!(value["weather"][0]["description"], "No data available");
    }
}

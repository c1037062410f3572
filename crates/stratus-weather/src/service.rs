use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use stratus_db::Database;
use stratus_types::api::WeatherQuery;
use stratus_types::models::Caller;

use crate::config::WeatherConfig;
use crate::error::{INVALID_LOCATION, LOCATION_REQUIRED, WeatherError};
use crate::types::{NO_COORDINATES, NO_DATA, NO_HISTORY, Observation, sentinel};

/// Days of hourly history fetched per lookup, counting back from yesterday.
const HISTORY_DAYS: i64 = 5;

type Params = Vec<(&'static str, String)>;

/// Stateless per call; clones share one HTTP client and one store handle.
#[derive(Clone)]
pub struct WeatherService {
    client: Client,
    config: Arc<WeatherConfig>,
    db: Arc<Database>,
}

impl WeatherService {
    pub fn new(config: WeatherConfig, db: Arc<Database>) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(WeatherError::transport)?;

        Ok(Self {
            client,
            config: Arc::new(config),
            db,
        })
    }

    /// Current conditions for a named place or a lat/lon pair. A successful
    /// lookup by an authenticated caller is appended to their history.
    pub async fn current_weather(
        &self,
        query: &WeatherQuery,
        caller: Option<&Caller>,
    ) -> Result<Value, WeatherError> {
        let mut params = self.base_params();
        if let Some(location) = non_empty(&query.location) {
            params.push(("q", location.to_string()));
        } else if let (Some(lat), Some(lon)) = (non_empty(&query.lat), non_empty(&query.lon)) {
            params.push(("lat", lat.to_string()));
            params.push(("lon", lon.to_string()));
        } else {
            return Err(WeatherError::Validation(LOCATION_REQUIRED.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/weather", self.config.api_url))
            .query(&params)
            .send()
            .await
            .map_err(WeatherError::transport)?;

        let status = response.status();
        debug!("Current weather response: {}", status);
        let data: Option<Value> = response.json().await.ok();

        let data = match data {
            Some(data) if status.is_success() && data.get("cod").and_then(Value::as_i64) == Some(200) => data,
            _ => {
                warn!("Current weather lookup rejected (status {})", status);
                return Err(WeatherError::Upstream(INVALID_LOCATION.to_string()));
            }
        };

        if let Some(caller) = caller {
            self.record(caller, &data).await;
        }

        Ok(data)
    }

    /// Forecast payload for a location, returned exactly as the provider sent it.
    pub async fn forecast(&self, location: Option<&str>) -> Result<Value, WeatherError> {
        let mut params = self.base_params();
        if let Some(location) = location {
            params.push(("q", location.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/forecast", self.config.api_url))
            .query(&params)
            .send()
            .await
            .map_err(WeatherError::transport)?;

        debug!("Forecast response: {}", response.status());
        response.json().await.map_err(WeatherError::decode)
    }

    /// Hourly observations at this hour on each of the previous five days.
    pub async fn weather_history(&self, location: &str) -> Result<Vec<Value>, WeatherError> {
        self.weather_history_at(location, Utc::now()).await
    }

    pub async fn weather_history_at(
        &self,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Value>, WeatherError> {
        let response = self
            .client
            .get(&self.config.geocode_url)
            .query(&[("q", location), ("appid", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(WeatherError::transport)?;

        let candidates = match response.json::<Value>().await {
            Ok(Value::Array(candidates)) => candidates,
            _ => Vec::new(),
        };

        let Some(first) = candidates.first() else {
            debug!("No geocoding candidates for {}", location);
            return Ok(vec![sentinel(NO_DATA)]);
        };

        let lat = first.get("lat").and_then(Value::as_f64);
        let lon = first.get("lon").and_then(Value::as_f64);
        let (Some(lat), Some(lon)) = (lat, lon) else {
            debug!("Geocoding candidate for {} has no coordinates", location);
            return Ok(vec![sentinel(NO_COORDINATES)]);
        };

        let mut collected = Vec::new();
        for days_ago in 1..=HISTORY_DAYS {
            let start = (now - Duration::days(days_ago)).timestamp();
            debug!("Requesting weather history for {} from {}", location, start);

            match self.history_point(lat, lon, start).await {
                Ok(items) => collected.extend(items),
                Err(e) => warn!("History query for {} at {} failed: {}", location, start, e),
            }
        }

        if collected.is_empty() {
            return Ok(vec![sentinel(NO_HISTORY)]);
        }

        Ok(collected)
    }

    async fn history_point(&self, lat: f64, lon: f64, start: i64) -> Result<Vec<Value>, WeatherError> {
        let mut params = self.base_params();
        params.extend([
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("type", "hour".to_string()),
            ("start", start.to_string()),
            ("cnt", "1".to_string()),
        ]);

        let response = self
            .client
            .get(&self.config.history_url)
            .query(&params)
            .send()
            .await
            .map_err(WeatherError::transport)?;

        let status = response.status();
        debug!("History response: {}", status);
        if !status.is_success() {
            return Ok(Vec::new());
        }

        let data: Value = response.json().await.map_err(WeatherError::decode)?;
        match data.get("list") {
            Some(Value::Array(items)) => Ok(items.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn record(&self, caller: &Caller, payload: &Value) {
        let Some(obs) = Observation::from_payload(payload) else {
            warn!(user_id = caller.user_id, "Weather payload missing fields, not recorded");
            return;
        };

        let db = self.db.clone();
        let user_id = caller.user_id;
        let result = tokio::task::spawn_blocking(move || {
            db.append_history(
                user_id,
                &obs.city,
                &obs.country,
                obs.temperature,
                &obs.description,
                Utc::now(),
            )
        })
        .await;

        match result {
            Ok(Ok(())) => info!(user_id, "Recorded weather lookup"),
            Ok(Err(e)) => error!(user_id, "Failed to record weather lookup: {}", e),
            Err(e) => error!("spawn_blocking join error: {}", e),
        }
    }

    fn base_params(&self) -> Params {
        vec![
            ("appid", self.config.api_key.clone()),
            ("units", "metric".to_string()),
        ]
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

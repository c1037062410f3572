use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_subscribed: bool,
}

/// A saved location. Ownership is the user id the ledger files it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub city: String,
    pub country: String,
}

impl FavoriteLocation {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// Query string the weather provider accepts for this place, e.g. `Paris,France`.
    pub fn query(&self) -> String {
        format!("{},{}", self.city, self.country)
    }
}

/// One successful current-weather lookup, recorded for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherHistoryRecord {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub description: String,
    /// UTC, second precision.
    pub date: NaiveDateTime,
}

/// Authenticated identity handed to the weather orchestrator and ledgers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub username: String,
}

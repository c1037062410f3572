//! Persisted row types. These mirror the on-disk JSON layout and stay
//! distinct from the stratus-types models handed to callers.
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stratus_types::UserId;
use stratus_types::models::{FavoriteLocation, User, WeatherHistoryRecord};

use crate::{Result, StoreError};

/// Fixed textual form of history timestamps.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type UsersDoc = BTreeMap<UserId, UserRow>;
pub type FavoritesDoc = BTreeMap<UserId, Vec<FavoriteLocation>>;
pub type HistoryDoc = BTreeMap<UserId, Vec<HistoryRow>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_subscribed: bool,
}

impl UserRow {
    pub fn to_user(&self, id: UserId) -> User {
        User {
            id,
            username: self.username.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            is_subscribed: self.is_subscribed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub description: String,
    pub date: String,
}

impl HistoryRow {
    pub fn into_record(self) -> Result<WeatherHistoryRecord> {
        let date = NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT).map_err(|source| {
            StoreError::Parse {
                value: self.date.clone(),
                source,
            }
        })?;

        Ok(WeatherHistoryRecord {
            city: self.city,
            country: self.country,
            temperature: self.temperature,
            description: self.description,
            date,
        })
    }
}

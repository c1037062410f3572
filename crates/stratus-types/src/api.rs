use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::UserId;
use crate::models::Caller;

// -- Session Claims --

/// Session token claims. Issued at login, checked by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub username: String,
    pub exp: usize,
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Caller {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub username: String,
    pub token: String,
}

// -- Weather --

/// Query for the current-weather endpoint. A location name wins over coordinates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherQuery {
    pub location: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
}

// -- Favorites --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FavoriteRequest {
    pub city: String,
    pub country: String,
}

/// A favorite with its live weather and the last five days of observations.
#[derive(Debug, Serialize)]
pub struct FavoriteWeather {
    pub city: String,
    pub country: String,
    pub weather: Value,
    pub history: Vec<Value>,
}

// -- Subscription --

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub is_subscribed: bool,
}

// -- Errors --

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use stratus_types::api::{FavoriteRequest, FavoriteWeather, WeatherQuery};
use stratus_types::models::Caller;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

const SUBSCRIPTION_REQUIRED: &str = "You must be subscribed to access favorites.";

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    require_subscription(&state, &caller).await?;
    Ok(Json(favorite_weather(&state, &caller).await?))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<FavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_subscription(&state, &caller).await?;

    if req.city.trim().is_empty() || req.country.trim().is_empty() {
        return Err(ApiError::BadRequest("City and country are required".into()));
    }

    let user_id = caller.user_id;
    blocking(&state, move |db| db.add_favorite(user_id, &req.city, &req.country)).await?;

    Ok(Json(favorite_weather(&state, &caller).await?))
}

/// Needs a session but not a subscription.
pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<FavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = caller.user_id;
    blocking(&state, move |db| db.remove_favorite(user_id, &req.city, &req.country)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_subscription(state: &AppState, caller: &Caller) -> Result<(), ApiError> {
    let user_id = caller.user_id;
    let user = blocking(state, move |db| Ok(db.get_user_by_id(user_id)))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !user.is_subscribed {
        return Err(ApiError::Forbidden(SUBSCRIPTION_REQUIRED.into()));
    }
    Ok(())
}

/// Each favorite with live weather and recent history. Lookup failures are
/// reported inline per favorite.
async fn favorite_weather(
    state: &AppState,
    caller: &Caller,
) -> Result<Vec<FavoriteWeather>, ApiError> {
    let user_id = caller.user_id;
    let favorites = blocking(state, move |db| Ok(db.list_favorites(user_id))).await?;

    let mut out = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        let query = WeatherQuery {
            location: Some(favorite.query()),
            ..Default::default()
        };

        let weather = state
            .weather
            .current_weather(&query, Some(caller))
            .await
            .unwrap_or_else(|e| json!({ "error": e.public_message() }));

        let history = state
            .weather
            .weather_history(&favorite.query())
            .await
            .unwrap_or_else(|e| vec![json!({ "error": e.public_message() })]);

        out.push(FavoriteWeather {
            city: favorite.city,
            country: favorite.country,
            weather,
            history,
        });
    }

    Ok(out)
}

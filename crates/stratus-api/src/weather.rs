use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};

use stratus_types::api::{LocationQuery, WeatherQuery};
use stratus_types::models::Caller;

use crate::auth::AppState;
use crate::error::ApiError;

/// GET /api/current_weather. Signed-in callers get the lookup added to their history.
pub async fn current_weather(
    State(state): State<AppState>,
    Extension(caller): Extension<Option<Caller>>,
    Query(query): Query<WeatherQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.weather.current_weather(&query, caller.as_ref()).await?;
    Ok(Json(data))
}

pub async fn weather_forecast(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.weather.forecast(query.location.as_deref()).await?;
    Ok(Json(data))
}

pub async fn weather_history(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let location = query
        .location
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Location is required".into()))?;

    let records = state.weather.weather_history(&location).await?;
    Ok(Json(records))
}

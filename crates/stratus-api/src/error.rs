use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use stratus_db::{Database, StoreError};
use stratus_types::api::ErrorResponse;
use stratus_weather::WeatherError;

use crate::auth::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Weather(WeatherError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Weather(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            ApiError::Store(e) => {
                error!("Store error: {}", e);
                "Internal server error".to_string()
            }
            ApiError::Weather(e) => {
                if matches!(e, WeatherError::Transport(_) | WeatherError::Decode(_)) {
                    warn!("Weather provider error: {}", e);
                }
                e.public_message()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Run a store operation off the async runtime.
pub async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || f(db.as_ref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

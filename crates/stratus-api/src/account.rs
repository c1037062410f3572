use axum::{Extension, Json, extract::State, response::IntoResponse};

use stratus_types::api::SubscriptionResponse;
use stratus_types::models::Caller;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

pub async fn subscribe(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    set_subscribed(&state, &caller, true).await
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    set_subscribed(&state, &caller, false).await
}

async fn set_subscribed(
    state: &AppState,
    caller: &Caller,
    is_subscribed: bool,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    let user_id = caller.user_id;
    blocking(state, move |db| db.set_subscribed(user_id, is_subscribed)).await?;
    Ok(Json(SubscriptionResponse { is_subscribed }))
}

/// GET /history — the caller's past lookups, oldest first.
pub async fn get_history(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = caller.user_id;
    let records = blocking(&state, move |db| db.list_history(user_id)).await?;
    Ok(Json(records))
}

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::account;
use crate::auth::{self, AppState};
use crate::favorites;
use crate::middleware::{optional_auth, require_auth};
use crate::weather;

/// All application routes. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/api/weather_forecast", get(weather::weather_forecast))
        .route("/api/weather_history", get(weather::weather_history));

    let session_aware_routes = Router::new()
        .route("/api/current_weather", get(weather::current_weather))
        .layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/favorites", get(favorites::list_favorites).post(favorites::add_favorite))
        .route("/favorites/delete", post(favorites::delete_favorite))
        .route("/history", get(account::get_history))
        .route("/subscribe", post(account::subscribe))
        .route("/unsubscribe", post(account::unsubscribe))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(session_aware_routes)
        .merge(protected_routes)
        .with_state(state)
}

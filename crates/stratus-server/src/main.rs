mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use stratus_api::{AppState, AppStateInner};
use stratus_db::Database;
use stratus_weather::WeatherService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stratus=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init store and weather client
    let db = Arc::new(Database::open(&config.data_dir)?);
    let weather = WeatherService::new(config.weather, db.clone())?;

    let state: AppState = Arc::new(AppStateInner {
        db,
        weather,
        jwt_secret: config.jwt_secret,
    });

    let app = stratus_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Stratus server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

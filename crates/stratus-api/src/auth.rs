use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;

use stratus_db::{Database, verify_password};
use stratus_types::UserId;
use stratus_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use stratus_weather::WeatherService;

use crate::error::{ApiError, blocking};
use crate::middleware::SESSION_COOKIE;

/// Session tokens stay valid this long after login.
const SESSION_DAYS: i64 = 30;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub weather: WeatherService,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username, email and password are required".into(),
        ));
    }

    let user = blocking(&state, move |db| {
        db.create_user(&req.username, &req.email, &req.password)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id: user.id })))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Lookup and Argon2 verification both run on the blocking pool
    let user = blocking(&state, move |db| {
        Ok(db
            .get_user_by_email(&req.email)
            .filter(|user| verify_password(user, &req.password)))
    })
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    let token = create_token(&state.jwt_secret, user.id, &user.username).map_err(|e| {
        tracing::error!("Failed to sign session token: {}", e);
        ApiError::Internal
    })?;

    info!(user_id = user.id, "User logged in");

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .permanent();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user_id: user.id,
            username: user.username,
            token,
        }),
    ))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    )
}

pub fn create_token(secret: &str, user_id: UserId, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

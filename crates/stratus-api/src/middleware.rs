use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};

use stratus_types::api::Claims;
use stratus_types::models::Caller;

use crate::auth::AppState;
use crate::error::ApiError;

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "stratus_session";

/// Reject requests without a valid session; otherwise attach `Extension<Caller>`.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = authenticate(&req, &jar, &state.jwt_secret).ok_or(ApiError::Unauthorized)?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

/// Attach `Extension<Option<Caller>>`; anonymous requests pass through.
pub async fn optional_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let caller = authenticate(&req, &jar, &state.jwt_secret);
    req.extensions_mut().insert(caller);
    next.run(req).await
}

/// Bearer header first, then the session cookie.
fn authenticate(req: &Request, jar: &CookieJar, secret: &str) -> Option<Caller> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match bearer {
        Some(token) => token.to_string(),
        None => jar.get(SESSION_COOKIE)?.value().to_string(),
    };

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    Some(token_data.claims.into())
}

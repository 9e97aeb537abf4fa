use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::account::{parser, registration};
use crate::auth::jwt::{encode_token, Claims, SESSION_DAYS};
use crate::auth::{verify_credentials, Identity};
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Identity,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Build a jar carrying the session cookie. Shared with the form login.
pub fn session_jar(token: &str) -> CookieJar {
    let cookie = Cookie::build(("access_token", token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_DAYS))
        .build();

    CookieJar::new().add(cookie)
}

pub fn clear_session_jar() -> CookieJar {
    let cookie = Cookie::build(("access_token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();

    CookieJar::new().add(cookie)
}

/// Issue a session for an identity: signed token plus the cookie jar.
pub fn issue_session(state: &SharedState, identity: &Identity) -> Result<(String, CookieJar), AppError> {
    let claims = Claims::new(
        identity.id,
        identity.name.clone(),
        identity.email.clone(),
        identity.role.clone(),
    );
    let token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;
    let jar = session_jar(&token);
    Ok((token, jar))
}

pub async fn register(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let form = parser::parse_request(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let user = registration::register(&state, &form).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    if state.login_limiter.check(&req.email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let Some(identity) = verify_credentials(&state.pool, &req.email, &req.password).await? else {
        state.login_limiter.record_failure(&req.email);
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    let (token, jar) = issue_session(&state, &identity)?;

    tracing::info!(user_id = %identity.id, "user logged in");

    Ok((
        jar,
        Json(LoginResponse {
            access_token: token,
            user: identity,
        }),
    ))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_session_jar(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

use askama::Template;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use serde::Deserialize;

use crate::account::{parser, registration};
use crate::auth::{jwt, verify_credentials};
use crate::error::AppError;
use crate::routes::auth::{clear_session_jar, issue_session};
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "auth/login.html")]
#[allow(dead_code)]
struct LoginTemplate {
    logged_in: bool,
    error: Option<String>,
    notice: Option<String>,
    next: String,
}

#[derive(Template)]
#[template(path = "auth/join.html")]
#[allow(dead_code)]
struct JoinTemplate {
    logged_in: bool,
}

#[derive(Template)]
#[template(path = "auth/join_owner.html")]
#[allow(dead_code)]
struct JoinOwnerTemplate {
    logged_in: bool,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/join_caretaker.html")]
#[allow(dead_code)]
struct JoinCaretakerTemplate {
    logged_in: bool,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub registered: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

/// Only same-origin paths are valid post-login targets.
fn safe_next(raw: &str) -> &str {
    if raw.starts_with('/') && !raw.starts_with("//") {
        raw
    } else {
        "/directory"
    }
}

fn login_form(error: Option<String>, notice: Option<String>, next: &str) -> Html<String> {
    let template = LoginTemplate {
        logged_in: false,
        error,
        notice,
        next: safe_next(next).to_string(),
    };
    Html(template.render().unwrap_or_default())
}

pub async fn login_page(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(q): Query<LoginQuery>,
) -> Response {
    // An already-valid session skips the form
    if let Some(cookie) = jar.get("access_token") {
        if jwt::decode_token(cookie.value(), &state.config.jwt_secret).is_ok() {
            return Redirect::to("/directory").into_response();
        }
    }

    let notice = q
        .registered
        .is_some()
        .then(|| "Account created. Please log in.".to_string());

    login_form(None, notice, q.next.as_deref().unwrap_or_default()).into_response()
}

pub async fn login_submit(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if state.login_limiter.check(&form.email).is_err() {
        return Ok(login_form(
            Some("Too many login attempts. Please try again later.".to_string()),
            None,
            &form.next,
        )
        .into_response());
    }

    let Some(identity) = verify_credentials(&state.pool, &form.email, &form.password).await? else {
        state.login_limiter.record_failure(&form.email);
        return Ok(login_form(
            Some("Invalid email or password".to_string()),
            None,
            &form.next,
        )
        .into_response());
    };

    let (_, jar) = issue_session(&state, &identity)?;

    tracing::info!(user_id = %identity.id, "user logged in");

    Ok((jar, Redirect::to(safe_next(&form.next))).into_response())
}

pub async fn logout_submit() -> (CookieJar, Redirect) {
    (clear_session_jar(), Redirect::to("/login"))
}

pub async fn join_page() -> impl IntoResponse {
    let template = JoinTemplate { logged_in: false };
    Html(template.render().unwrap_or_default())
}

fn owner_form(error: Option<String>) -> Html<String> {
    let template = JoinOwnerTemplate {
        logged_in: false,
        error,
    };
    Html(template.render().unwrap_or_default())
}

fn caretaker_form(error: Option<String>) -> Html<String> {
    let template = JoinCaretakerTemplate {
        logged_in: false,
        error,
    };
    Html(template.render().unwrap_or_default())
}

pub async fn join_owner_page() -> impl IntoResponse {
    owner_form(None)
}

pub async fn join_caretaker_page() -> impl IntoResponse {
    caretaker_form(None)
}

/// The message shown when a registration form fails. Validation and
/// conflict messages pass through; anything else stays generic.
fn join_error(err: AppError) -> String {
    match err {
        AppError::BadRequest(msg) | AppError::Conflict(msg) => msg,
        other => {
            tracing::error!("Registration failed: {other}");
            "Something went wrong. Please try again.".to_string()
        }
    }
}

pub async fn join_owner_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let form = match parser::parse_request(&headers, body).await {
        Ok(form) => form,
        Err(msg) => return owner_form(Some(msg)).into_response(),
    };

    match registration::register(&state, &form).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "owner registered via form");
            Redirect::to("/login?registered=1").into_response()
        }
        Err(err) => owner_form(Some(join_error(err))).into_response(),
    }
}

pub async fn join_caretaker_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let form = match parser::parse_request(&headers, body).await {
        Ok(form) => form,
        Err(msg) => return caretaker_form(Some(msg)).into_response(),
    };

    match registration::register(&state, &form).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "caretaker registered via form");
            Redirect::to("/login?registered=1").into_response()
        }
        Err(err) => caretaker_form(Some(join_error(err))).into_response(),
    }
}

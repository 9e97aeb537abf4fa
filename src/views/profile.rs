use askama::Template;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use bytes::Bytes;
use serde::Deserialize;

use crate::account::{parser, update};
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::routes::auth::clear_session_jar;
use crate::state::SharedState;

use super::{availability_label, role_label};

#[derive(Template)]
#[template(path = "profile/show.html")]
#[allow(dead_code)]
struct ProfileTemplate {
    logged_in: bool,
    notice: Option<String>,
    name: String,
    email: String,
    role_label: &'static str,
    location: String,
    phone: Option<String>,
    availability: Option<String>,
    image: Option<String>,
    is_owner: bool,
    pet_type: Option<String>,
    pet_name: Option<String>,
    pet_age: Option<String>,
    pet_breed: Option<String>,
    pet_gender: Option<String>,
    pet_image: Option<String>,
}

#[derive(Template)]
#[template(path = "profile/edit.html")]
#[allow(dead_code)]
struct EditProfileTemplate {
    logged_in: bool,
    error: Option<String>,
    name: String,
    location: String,
    phone: String,
    availability_from: String,
    availability_to: String,
    is_owner: bool,
    pet_type: String,
    pet_name: String,
    pet_age: String,
    pet_breed: String,
    pet_gender: String,
}

#[derive(Deserialize)]
pub struct ProfileQuery {
    pub saved: Option<String>,
}

async fn own_user(state: &SharedState, auth: &AuthUser) -> Result<User, AppError> {
    db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session account no longer exists".to_string()))
}

pub async fn show(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(q): Query<ProfileQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = own_user(&state, &auth).await?;

    let notice = q.saved.is_some().then(|| "Profile updated.".to_string());

    let is_owner = user.role == "owner";
    let template = ProfileTemplate {
        logged_in: true,
        notice,
        role_label: role_label(&user.role),
        availability: availability_label(user.availability_from, user.availability_to),
        name: user.name,
        email: user.email,
        location: user.location,
        phone: user.phone,
        image: user.image,
        is_owner,
        pet_type: user.pet_type,
        pet_name: user.pet_name,
        pet_age: user.pet_age.map(|age| age.to_string()),
        pet_breed: user.pet_breed,
        pet_gender: user.pet_gender,
        pet_image: user.pet_image,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

fn edit_form(user: &User, error: Option<String>) -> Html<String> {
    let template = EditProfileTemplate {
        logged_in: true,
        error,
        name: user.name.clone(),
        location: user.location.clone(),
        phone: user.phone.clone().unwrap_or_default(),
        availability_from: user
            .availability_from
            .map(|d| d.to_string())
            .unwrap_or_default(),
        availability_to: user
            .availability_to
            .map(|d| d.to_string())
            .unwrap_or_default(),
        is_owner: user.role == "owner",
        pet_type: user.pet_type.clone().unwrap_or_default(),
        pet_name: user.pet_name.clone().unwrap_or_default(),
        pet_age: user.pet_age.map(|age| age.to_string()).unwrap_or_default(),
        pet_breed: user.pet_breed.clone().unwrap_or_default(),
        pet_gender: user.pet_gender.clone().unwrap_or_default(),
    };
    Html(template.render().unwrap_or_default())
}

pub async fn edit_page(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let user = own_user(&state, &auth).await?;
    Ok(edit_form(&user, None))
}

pub async fn update_submit(
    auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let user = own_user(&state, &auth).await?;

    let form = match parser::parse_request(&headers, body).await {
        Ok(form) => form,
        Err(msg) => return Ok(edit_form(&user, Some(msg)).into_response()),
    };

    match update::apply_update(&state, &user, &form).await {
        Ok(updated) => {
            tracing::info!(user_id = %updated.id, "profile updated via form");
            Ok(Redirect::to("/profile?saved=1").into_response())
        }
        Err(AppError::BadRequest(msg)) => Ok(edit_form(&user, Some(msg)).into_response()),
        Err(other) => Err(other),
    }
}

pub async fn delete_submit(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Response, AppError> {
    let user = own_user(&state, &auth).await?;

    db::users::delete(&state.pool, user.id).await?;

    if let Some(path) = &user.image {
        state.uploads.remove(path).await;
    }
    if let Some(path) = &user.pet_image {
        state.uploads.remove(path).await;
    }

    tracing::info!(user_id = %user.id, "account deleted via form");

    Ok((clear_session_jar(), Redirect::to("/")).into_response())
}

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db::{self, users::DirectoryFilter};
use crate::error::AppError;
use crate::models::{Role, User};
use crate::state::SharedState;

use super::{availability_label, role_label};

const PET_TYPE_FILTERS: [&str; 4] = ["dog", "cat", "rabbit", "other"];

#[derive(Template)]
#[template(path = "directory/index.html")]
#[allow(dead_code)]
struct DirectoryTemplate {
    logged_in: bool,
    role: String,
    location: String,
    pet_type: String,
    cards: Vec<DirectoryCard>,
}

#[allow(dead_code)]
struct DirectoryCard {
    id: String,
    name: String,
    role_label: &'static str,
    location: String,
    pet_type: Option<String>,
    image: Option<String>,
}

#[derive(Template)]
#[template(path = "directory/profile.html")]
#[allow(dead_code)]
struct PublicProfileTemplate {
    logged_in: bool,
    name: String,
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
#[template(path = "directory/not_found.html")]
#[allow(dead_code)]
struct NotFoundTemplate {
    logged_in: bool,
}

#[derive(Deserialize)]
pub struct DirectoryQuery {
    pub role: Option<String>,
    pub location: Option<String>,
    pub pet_type: Option<String>,
}

/// Filter selections coming from the page controls. Unlike the JSON API,
/// unrecognized values are dropped rather than rejected.
fn lenient_filter(query: &DirectoryQuery) -> DirectoryFilter {
    let role = query
        .role
        .as_deref()
        .map(str::trim)
        .and_then(Role::parse)
        .map(|role| role.as_str().to_string());

    let pet_type = query
        .pet_type
        .as_deref()
        .map(|raw| raw.trim().to_lowercase())
        .filter(|normalized| PET_TYPE_FILTERS.contains(&normalized.as_str()));

    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|loc| !loc.is_empty())
        .map(str::to_string);

    DirectoryFilter {
        role,
        location,
        pet_type,
    }
}

pub async fn index(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<DirectoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = lenient_filter(&query);
    let users = db::users::list(&state.pool, &filter).await?;

    let cards = users
        .into_iter()
        .map(|user| DirectoryCard {
            id: user.id.to_string(),
            name: user.name,
            role_label: role_label(&user.role),
            location: user.location,
            pet_type: user.pet_type,
            image: user.image,
        })
        .collect();

    let template = DirectoryTemplate {
        logged_in: true,
        role: filter.role.unwrap_or_default(),
        location: filter.location.unwrap_or_default(),
        pet_type: filter.pet_type.unwrap_or_default(),
        cards,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

fn not_found_page() -> Response {
    let template = NotFoundTemplate { logged_in: true };
    (
        StatusCode::NOT_FOUND,
        Html(template.render().unwrap_or_default()),
    )
        .into_response()
}

pub async fn show(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Ok(not_found_page());
    };

    let Some(user) = db::users::find_by_id(&state.pool, id).await? else {
        return Ok(not_found_page());
    };

    Ok(public_profile(user).into_response())
}

fn public_profile(user: User) -> Html<String> {
    let is_owner = user.role == "owner";
    let template = PublicProfileTemplate {
        logged_in: true,
        role_label: role_label(&user.role),
        availability: availability_label(user.availability_from, user.availability_to),
        name: user.name,
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
    Html(template.render().unwrap_or_default())
}

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::account::{parser, update};
use crate::auth::extractor::AuthUser;
use crate::db::{self, users::DirectoryFilter};
use crate::error::AppError;
use crate::models::{Role, UserKey, UserSummary};
use crate::state::SharedState;

const PET_TYPE_FILTERS: [&str; 4] = ["dog", "cat", "rabbit", "other"];

#[derive(Deserialize)]
pub struct ListQuery {
    pub role: Option<String>,
    pub location: Option<String>,
    pub pet_type: Option<String>,
    pub view: Option<String>,
}

/// Strict filter validation for the JSON API. Unknown filter values are a
/// client error rather than an empty result set.
pub fn directory_filter(query: &ListQuery) -> Result<DirectoryFilter, AppError> {
    let role = match query.role.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            Role::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown role filter: {raw}")))?
                .as_str()
                .to_string(),
        ),
    };

    let pet_type = match query.pet_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let normalized = raw.to_lowercase();
            if !PET_TYPE_FILTERS.contains(&normalized.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Unknown pet type filter: {raw}"
                )));
            }
            Some(normalized)
        }
    };

    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|loc| !loc.is_empty())
        .map(str::to_string);

    Ok(DirectoryFilter {
        role,
        location,
        pet_type,
    })
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = directory_filter(&query)?;
    let users = db::users::list(&state.pool, &filter).await?;

    let body = match query.view.as_deref() {
        Some("summary") => {
            let summaries: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();
            json!({ "users": summaries })
        }
        None | Some("full") => json!({ "users": users }),
        Some(other) => {
            return Err(AppError::BadRequest(format!("Unknown view: {other}")));
        }
    };

    Ok(Json(body))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let key = UserKey::parse(&key);
    let user = db::users::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "user": user })))
}

pub async fn put(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let key = UserKey::parse(&key);
    let target = db::users::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    auth.require_self(target.id)?;

    let form = parser::parse_request(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let updated = update::apply_update(&state, &target, &form).await?;

    tracing::info!(user_id = %updated.id, "profile updated");

    Ok(Json(json!({ "user": updated })))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let key = UserKey::parse(&key);
    let target = db::users::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    auth.require_self(target.id)?;

    let removed = db::users::delete(&state.pool, target.id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    if let Some(path) = &target.image {
        state.uploads.remove(path).await;
    }
    if let Some(path) = &target.pet_image {
        state.uploads.remove(path).await;
    }

    tracing::info!(user_id = %target.id, "account deleted");

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

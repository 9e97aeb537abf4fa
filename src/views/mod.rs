pub mod auth;
pub mod directory;
pub mod profile;

use axum::routing::{get, post};
use axum::Router;

use chrono::NaiveDate;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Auth views
        .route("/", get(auth::login_page))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout_submit))
        .route("/join", get(auth::join_page))
        .route(
            "/join/owner",
            get(auth::join_owner_page).post(auth::join_owner_submit),
        )
        .route(
            "/join/caretaker",
            get(auth::join_caretaker_page).post(auth::join_caretaker_submit),
        )
        // Directory
        .route("/directory", get(directory::index))
        .route("/directory/{id}", get(directory::show))
        // Own profile
        .route("/profile", get(profile::show).post(profile::update_submit))
        .route("/profile/edit", get(profile::edit_page))
        .route("/profile/delete", post(profile::delete_submit))
}

fn role_label(role: &str) -> &'static str {
    match role {
        "owner" => "Pet owner",
        "caretaker" => "Caretaker",
        _ => "Member",
    }
}

/// Human-readable availability window; `None` when the record has neither
/// bound.
fn availability_label(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<String> {
    match (from, to) {
        (Some(from), Some(to)) => Some(format!("{from} to {to}")),
        (Some(from), None) => Some(format!("from {from}")),
        (None, Some(to)) => Some(format!("until {to}")),
        (None, None) => None,
    }
}

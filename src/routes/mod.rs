pub mod auth;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/users", get(users::list))
        .route(
            "/api/users/{key}",
            get(users::get).put(users::put).delete(users::delete),
        )
}

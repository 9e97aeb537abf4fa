use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

/// Middleware that turns 401 responses from page handlers into a redirect
/// to the login form, keeping the requested path so a successful login can
/// land back on it.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
        Redirect::to(&format!("/login?next={encoded}")).into_response()
    } else {
        response
    }
}

//! The fixed response.
//!
//! Every request gets the same answer, whatever its method, path or headers.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Response body.
pub const HELLO_BODY: &str = "Hello World\n";

/// Response content type.
pub const CONTENT_TYPE: &str = "text/plain";

/// `200 OK`, `text/plain`, `Hello World\n`.
pub fn hello_world() -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], HELLO_BODY).into_response()
}

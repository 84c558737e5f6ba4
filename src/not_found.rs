use axum::response::{IntoResponse, Response};

use crate::Error;

/// Fallback handler for unknown routes, responds with a JSON not found error.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use crate::errors::AppError;

// Converts AppError into a response. Form handlers deal with API and validation
// failures themselves, so anything reaching this point is a page-level failure.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors go back to the login page
            AppError::Auth(msg) => {
                Redirect::to(&format!("/?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            AppError::Session(e) => {
                tracing::error!("Session store failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error").into_response()
            }

            AppError::Api(e) => (
                StatusCode::BAD_GATEWAY,
                format!("Task service error: {}", e)
            ).into_response(),

            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                msg
            ).into_response(),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                msg
            ).into_response(),

            AppError::Template(e) => {
                tracing::error!("Failed to load template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error loading page").into_response()
            }
        }
    }
}

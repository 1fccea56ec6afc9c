// Error types for the dashboard and for calls to the task API.
use thiserror::Error;

pub mod api;
pub mod response;

pub use api::{ApiError, ApiResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Template error: {0}")]
    Template(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

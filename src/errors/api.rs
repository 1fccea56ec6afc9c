use thiserror::Error;

/// Failure of a single call to the task API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    // success:false, message is whatever the API sent (possibly nothing)
    #[error("Rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),
}

impl ApiError {
    /// Text shown to the user. API-supplied messages are passed through verbatim;
    /// `fallback` covers rejections that arrive without one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected(Some(message)) if !message.trim().is_empty() => message.clone(),
            ApiError::Rejected(_) => fallback.to_string(),
            ApiError::Status(code) => format!("HTTP {}", code),
            ApiError::Transport(e) => e.to_string(),
            ApiError::Decode(e) => format!("Unexpected response from server: {}", e),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

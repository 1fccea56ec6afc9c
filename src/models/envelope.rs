use serde::Deserialize;
use super::User;

/// Uniform response body of every task API endpoint.
#[derive(Deserialize, Debug)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    // login only
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

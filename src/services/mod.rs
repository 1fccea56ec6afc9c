pub mod api_client;
pub mod session;
pub mod task_views;
pub mod validation;
pub mod listing;

pub use api_client::ApiClient;

mod auth;
mod admin;
mod tasks;
mod clients;
mod users;
mod reports;
mod employee;

pub use auth::{serve_login_page, handle_login, handle_logout};
pub use admin::{serve_admin_dashboard, delete_task};
pub use tasks::{
    serve_assign_form, handle_assign, serve_assign_done, serve_task_edit, handle_task_edit,
    serve_approvals, handle_approval,
};
pub use clients::{
    serve_clients, serve_new_client, serve_edit_client, create_client, update_client, delete_client,
};
pub use users::{serve_users, serve_new_user, serve_edit_user, create_user, update_user, delete_user};
pub use reports::{serve_reports, download_report};
pub use employee::{
    serve_employee_dashboard, serve_status_form, handle_status_update, serve_profile, handle_profile,
};

use serde::Serialize;
use tower_sessions::Session;
use crate::config::Config;
use crate::errors::{ApiResult, AppResult};
use crate::models::ListQuery;
use crate::services::{
    listing::ListState,
    session::{clear_draft, save_draft, Notice},
    ApiClient,
};
use crate::views::Templates;

pub(crate) type AppState = (ApiClient, Config);

pub(crate) fn templates(config: &Config) -> Templates {
    Templates::new(&config.ui.template_dir)
}

/// Notification texts for one kind of submission.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Messages {
    success: &'static str,
    failure: &'static str,
    // prefer the API's own success message when it sends one
    api_success: bool,
}

impl Messages {
    pub const fn api(success: &'static str, failure: &'static str) -> Self {
        Self { success, failure, api_success: true }
    }

    pub const fn fixed(success: &'static str, failure: &'static str) -> Self {
        Self { success, failure, api_success: false }
    }
}

/// Turns the result of a mutation into a notice. Returns whether it succeeded.
pub(crate) async fn announce(
    session: &Session,
    result: ApiResult<Option<String>>,
    messages: Messages,
) -> AppResult<bool> {
    match result {
        Ok(message) => {
            let text = message
                .filter(|m| messages.api_success && !m.trim().is_empty())
                .unwrap_or_else(|| messages.success.to_string());
            Notice::success(text).flash(session).await?;
            Ok(true)
        }
        Err(e) => {
            Notice::error(e.user_message(messages.failure)).flash(session).await?;
            Ok(false)
        }
    }
}

/// Like [`announce`], and also keeps the draft on failure or discards it on success.
pub(crate) async fn settle<T: Serialize>(
    session: &Session,
    form: &str,
    draft: &T,
    result: ApiResult<Option<String>>,
    messages: Messages,
) -> AppResult<bool> {
    let succeeded = announce(session, result, messages).await?;
    if succeeded {
        clear_draft(session, form).await?;
    } else {
        save_draft(session, form, draft).await?;
    }
    Ok(succeeded)
}

/// Local validation failure: nothing was sent, the input is kept.
pub(crate) async fn reject<T: Serialize>(session: &Session, form: &str, draft: &T, message: &str) -> AppResult<()> {
    tracing::debug!("Form {} failed validation: {}", form, message);
    save_draft(session, form, draft).await?;
    Notice::error(message).flash(session).await
}

/// Rebuilds the list state from the query string; a changed term starts over at page 1.
pub(crate) fn list_state(query: &ListQuery) -> ListState {
    let term = query.q.as_deref().unwrap_or("").trim();
    let shown_with = query.prev_q.as_deref().map(str::trim).unwrap_or(term);
    let mut state = ListState::new(shown_with, query.page.unwrap_or(1));
    state.set_term(term);
    state
}

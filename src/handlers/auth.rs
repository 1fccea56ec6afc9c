use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Response, Redirect},
};
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::{LoginForm, LoginQuery};
use crate::services::{session::SessionContext, validation};
use crate::views::escape;
use super::{templates, AppState};

/// Landing page for a signed-in user.
pub fn home(ctx: &SessionContext) -> &'static str {
    if ctx.is_admin() { "/admin" } else { "/employee" }
}

pub async fn serve_login_page(
    State((_, config)): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> AppResult<Response> {
    if let Some(ctx) = SessionContext::load(&session).await? {
        return Ok(Redirect::to(home(&ctx)).into_response());
    }

    let error = query
        .error
        .map(|e| format!(r#"<div class="error-message">{}</div>"#, escape(&e)))
        .unwrap_or_default();
    let templates = templates(&config);
    let body = templates.render("login.html", &[("error", error.as_str())])?;
    Ok(templates.page("Login", None, None, &body)?.into_response())
}

#[axum::debug_handler]
pub async fn handle_login(
    State((api, _)): State<AppState>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> AppResult<Response> {
    validation::validate_login(&login_form.username, &login_form.password)
        .map_err(|msg| AppError::Auth(msg.to_string()))?;

    tracing::info!("Login attempt for user: {}", login_form.username);

    let ctx = api
        .login(login_form.username.trim(), &login_form.password)
        .await
        .map_err(|e| {
            tracing::warn!("Login failed for user {}: {}", login_form.username, e);
            AppError::Auth(e.user_message("Login failed"))
        })?;

    // new session id for the authenticated session
    session.cycle_id().await?;
    ctx.store(&session).await?;

    tracing::info!("User {} logged in as {}", ctx.user.username, ctx.user.role.as_str());
    Ok(Redirect::to(home(&ctx)).into_response())
}

#[axum::debug_handler]
pub async fn handle_logout(
    session: Session,
) -> Response {
    if let Err(e) = SessionContext::destroy(&session).await {
        tracing::error!("Session removal error: {}", e);
    }
    Redirect::to("/").into_response()
}

use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response, Redirect},
    Extension,
};
use tower_sessions::Session;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::UserForm;
use crate::services::{
    api_client::UserRequest,
    session::{take_draft, Notice, SessionContext},
    validation,
};
use crate::views::{escape, fragments};
use super::{announce, reject, settle, templates, AppState, Messages};

fn draft_key(user_id: Option<i64>) -> String {
    match user_id {
        Some(id) => format!("user:{}", id),
        None => "user:new".to_string(),
    }
}

fn form_path(user_id: Option<i64>) -> String {
    match user_id {
        Some(id) => format!("/admin/users/{}/edit", id),
        None => "/admin/users/new".to_string(),
    }
}

pub async fn serve_users(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;
    let users = api.users(&ctx).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load users: {}", e);
        Vec::new()
    });

    let templates = templates(&config);
    let body = templates.render("users.html", &[("table", fragments::user_table(&users).as_str())])?;
    Ok(templates.page("User Management", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

fn render_form(
    config: &Config,
    ctx: &SessionContext,
    notice: Option<&Notice>,
    user_id: Option<i64>,
    draft: &UserForm,
) -> AppResult<Response> {
    let (heading, action, submit, password_label, password_required) = match user_id {
        Some(id) => (
            "Edit User",
            format!("/admin/users/{}", id),
            "Update User",
            "Password (leave blank to keep current)",
            "",
        ),
        None => ("Add New User", "/admin/users".to_string(), "Create User", "Password *", "required"),
    };

    let templates = templates(config);
    let body = templates.render(
        "user_form.html",
        &[
            ("heading", heading),
            ("action", action.as_str()),
            ("name", escape(&draft.name).as_str()),
            ("username", escape(&draft.username).as_str()),
            ("password_label", password_label),
            ("password_required", password_required),
            ("role_options", fragments::role_options(draft.role).as_str()),
            ("submit", fragments::submit_button(submit, "Saving...").as_str()),
        ],
    )?;
    Ok(templates.page(heading, Some(ctx), notice, &body)?.into_response())
}

pub async fn serve_new_user(
    State((_, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;
    let draft = take_draft::<UserForm>(&session, &draft_key(None)).await?.unwrap_or_default();
    render_form(&config, &ctx, notice.as_ref(), None, &draft)
}

pub async fn serve_edit_user(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(user_id): Path<i64>,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;

    let draft = match take_draft::<UserForm>(&session, &draft_key(Some(user_id))).await? {
        Some(draft) => draft,
        None => match api.user(&ctx, user_id).await {
            Ok(user) => UserForm {
                name: user.name,
                username: user.username,
                password: String::new(),
                role: user.role,
            },
            Err(e) => {
                tracing::warn!("Failed to load user {}: {}", user_id, e);
                Notice::error(e.user_message("Failed to load user")).flash(&session).await?;
                return Ok(Redirect::to("/admin/users").into_response());
            }
        },
    };
    render_form(&config, &ctx, notice.as_ref(), Some(user_id), &draft)
}

async fn save_user(
    state: AppState,
    ctx: SessionContext,
    session: Session,
    user_id: Option<i64>,
    form: UserForm,
) -> AppResult<Response> {
    let (api, _) = state;
    let key = draft_key(user_id);
    let draft = form.without_password();

    if let Err(msg) = validation::validate_user(&form, user_id.is_none()) {
        reject(&session, &key, &draft, msg).await?;
        return Ok(Redirect::to(&form_path(user_id)).into_response());
    }

    let request = UserRequest {
        id: user_id,
        name: form.name.trim().to_string(),
        username: form.username.trim().to_string(),
        password: Some(form.password).filter(|p| !p.trim().is_empty()),
        role: form.role,
    };
    let result = match user_id {
        Some(id) => {
            tracing::info!("Updating user {}", id);
            api.update_user(&ctx, &request).await
        }
        None => {
            tracing::info!("Creating user {}", request.username);
            api.create_user(&ctx, &request).await
        }
    };

    let messages = Messages::api("Operation successful", "Operation failed");
    if settle(&session, &key, &draft, result, messages).await? {
        Ok(Redirect::to("/admin/users").into_response())
    } else {
        Ok(Redirect::to(&form_path(user_id)).into_response())
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    save_user(state, ctx, session, None, form).await
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(user_id): Path<i64>,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    save_user(state, ctx, session, Some(user_id), form).await
}

pub async fn delete_user(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(user_id): Path<i64>,
) -> AppResult<Response> {
    if user_id == ctx.user.id {
        Notice::error("You cannot delete your own account").flash(&session).await?;
        return Ok(Redirect::to("/admin/users").into_response());
    }

    tracing::info!("Deleting user {}", user_id);
    let result = api.delete_user(&ctx, user_id).await;
    announce(&session, result, Messages::api("User deleted successfully", "Failed to delete user")).await?;
    Ok(Redirect::to("/admin/users").into_response())
}

use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Response, Redirect},
    Extension,
};
use tower_sessions::Session;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::{ClientForm, ListQuery};
use crate::services::{
    api_client::ClientRequest,
    listing,
    session::{take_draft, Notice, SessionContext},
    validation,
};
use crate::views::{escape, fragments};
use super::{announce, reject, settle, templates, AppState, Messages};

const SAVE_MESSAGES: Messages = Messages::api("Operation successful", "Operation failed");

fn draft_key(client_id: Option<i64>) -> String {
    match client_id {
        Some(id) => format!("client:{}", id),
        None => "client:new".to_string(),
    }
}

fn form_path(client_id: Option<i64>) -> String {
    match client_id {
        Some(id) => format!("/admin/clients/{}/edit", id),
        None => "/admin/clients/new".to_string(),
    }
}

pub async fn serve_clients(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;
    let term = query.q.as_deref().unwrap_or("").trim();

    let clients = api.clients(&ctx).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load clients: {}", e);
        Vec::new()
    });
    let matches = listing::search_clients(&clients, term);
    tracing::debug!("{} of {} clients match '{}'", matches.len(), clients.len(), term);

    let templates = templates(&config);
    let body = templates.render(
        "clients.html",
        &[("q", escape(term).as_str()), ("table", fragments::client_table(&matches).as_str())],
    )?;
    Ok(templates.page("Client Management", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

fn render_form(
    config: &Config,
    ctx: &SessionContext,
    notice: Option<&Notice>,
    client_id: Option<i64>,
    draft: &ClientForm,
) -> AppResult<Response> {
    let (heading, action, submit) = match client_id {
        Some(id) => ("Edit Client", format!("/admin/clients/{}", id), "Update Client"),
        None => ("Add New Client", "/admin/clients".to_string(), "Create Client"),
    };

    let templates = templates(config);
    let body = templates.render(
        "client_form.html",
        &[
            ("heading", heading),
            ("action", action.as_str()),
            ("name", escape(&draft.name).as_str()),
            ("code", escape(&draft.code).as_str()),
            ("submit", fragments::submit_button(submit, "Saving...").as_str()),
        ],
    )?;
    Ok(templates.page(heading, Some(ctx), notice, &body)?.into_response())
}

pub async fn serve_new_client(
    State((_, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;
    let draft = take_draft::<ClientForm>(&session, &draft_key(None)).await?.unwrap_or_default();
    render_form(&config, &ctx, notice.as_ref(), None, &draft)
}

pub async fn serve_edit_client(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(client_id): Path<i64>,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;

    let draft = match take_draft::<ClientForm>(&session, &draft_key(Some(client_id))).await? {
        Some(draft) => draft,
        None => match api.client(&ctx, client_id).await {
            Ok(client) => ClientForm { name: client.name, code: client.code },
            Err(e) => {
                tracing::warn!("Failed to load client {}: {}", client_id, e);
                Notice::error(e.user_message("Failed to load client")).flash(&session).await?;
                return Ok(Redirect::to("/admin/clients").into_response());
            }
        },
    };
    render_form(&config, &ctx, notice.as_ref(), Some(client_id), &draft)
}

async fn save_client(
    state: AppState,
    ctx: SessionContext,
    session: Session,
    client_id: Option<i64>,
    form: ClientForm,
) -> AppResult<Response> {
    let (api, _) = state;
    let key = draft_key(client_id);

    // Invalid input never reaches the API
    let valid = match validation::validate_client(&form) {
        Ok(valid) => valid,
        Err(msg) => {
            reject(&session, &key, &form, msg).await?;
            return Ok(Redirect::to(&form_path(client_id)).into_response());
        }
    };

    let request = ClientRequest { id: client_id, name: valid.name, code: valid.code };
    let result = match client_id {
        Some(id) => {
            tracing::info!("Updating client {}", id);
            api.update_client(&ctx, &request).await
        }
        None => {
            tracing::info!("Creating client {}", request.code);
            api.create_client(&ctx, &request).await
        }
    };

    if settle(&session, &key, &form, result, SAVE_MESSAGES).await? {
        Ok(Redirect::to("/admin/clients").into_response())
    } else {
        Ok(Redirect::to(&form_path(client_id)).into_response())
    }
}

pub async fn create_client(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Form(form): Form<ClientForm>,
) -> AppResult<Response> {
    save_client(state, ctx, session, None, form).await
}

pub async fn update_client(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(client_id): Path<i64>,
    Form(form): Form<ClientForm>,
) -> AppResult<Response> {
    save_client(state, ctx, session, Some(client_id), form).await
}

pub async fn delete_client(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(client_id): Path<i64>,
) -> AppResult<Response> {
    tracing::info!("Deleting client {}", client_id);
    let result = api.delete_client(&ctx, client_id).await;
    announce(&session, result, Messages::api("Client deleted successfully", "Failed to delete client")).await?;
    Ok(Redirect::to("/admin/clients").into_response())
}

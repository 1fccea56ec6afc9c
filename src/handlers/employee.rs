use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Response, Redirect},
    Extension,
};
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::{ListQuery, ProfileForm, StatusUpdateForm, Task, TaskStatus, TabForm};
use crate::services::{
    api_client::{StatusUpdateRequest, UserRequest},
    listing,
    session::{take_draft, Notice, SessionContext},
    task_views::{self, TaskView},
    ApiClient,
};
use crate::views::{escape, fragments::{self, RowActions}};
use super::{list_state, reject, settle, templates, AppState, Messages};

const EMPLOYEE_TABS: [(TaskView, &str); 4] = [
    (TaskView::Assigned, "Assigned Tasks"),
    (TaskView::InProgress, "In Progress"),
    (TaskView::Completed, "Completed Tasks"),
    (TaskView::Pending, "Pending Tasks"),
];

const PROFILE_DRAFT: &str = "profile";
const LOCKED: &str = "Approved tasks can no longer be updated";

fn employee_view(tab: Option<&str>) -> TaskView {
    tab.and_then(TaskView::parse)
        .filter(|v| TaskView::EMPLOYEE_TABS.contains(v))
        .unwrap_or(TaskView::Assigned)
}

fn dashboard_path(view: TaskView) -> String {
    format!("/employee?tab={}", view.key())
}

fn status_draft(task_id: i64) -> String {
    format!("status:{}", task_id)
}

pub async fn serve_employee_dashboard(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let view = employee_view(query.tab.as_deref());
    tracing::info!("Employee dashboard for {}, tab {}", ctx.user.id, view.key());

    let notice = Notice::take(&session).await?;

    // Unlike the admin dashboard, a failed load just shows the empty list
    let tasks = api.employee_tasks(&ctx, ctx.user.id).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load tasks for employee {}: {}", ctx.user.id, e);
        Vec::new()
    });

    let (visible, stats) = task_views::derive(&tasks, view);
    let state = list_state(&query);
    let matches = listing::search_tasks(&visible, state.term());
    let page = listing::paginate(&matches, state.page(), config.ui.page_size);

    let templates = templates(&config);
    let content = templates.render(
        "task_list.html",
        &[
            ("title", view.title()),
            ("search", fragments::search_form("/employee", view.key(), &state).as_str()),
            ("refresh", dashboard_path(view).as_str()),
            ("table", fragments::task_table(page.items, RowActions::Employee, view.key()).as_str()),
            ("pagination", fragments::pagination("/employee", view.key(), state.term(), &page).as_str()),
        ],
    )?;
    let body = templates.render(
        "dashboard.html",
        &[
            ("stats", fragments::stats_cards(&stats).as_str()),
            ("tabs", fragments::tabs("/employee", &EMPLOYEE_TABS, view).as_str()),
            ("banner", ""),
            ("content", content.as_str()),
        ],
    )?;
    Ok(templates.page("My Tasks", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

async fn own_task(api: &ApiClient, ctx: &SessionContext, task_id: i64) -> AppResult<Task> {
    api.employee_tasks(ctx, ctx.user.id)
        .await?
        .into_iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))
}

pub async fn serve_status_form(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(task_id): Path<i64>,
    Query(query): Query<TabForm>,
) -> AppResult<Response> {
    let view = employee_view(query.tab.as_deref());
    let task = own_task(&api, &ctx, task_id).await?;

    if !task.editable_by_assignee() {
        Notice::error(LOCKED).flash(&session).await?;
        return Ok(Redirect::to(&dashboard_path(view)).into_response());
    }

    let notice = Notice::take(&session).await?;
    let draft = match take_draft::<StatusUpdateForm>(&session, &status_draft(task_id)).await? {
        Some(draft) => draft,
        None => StatusUpdateForm {
            status: match task.status {
                TaskStatus::Unrecognized => TaskStatus::Pending,
                known => known,
            },
            updated_till: task.updated_till.clone().unwrap_or_default(),
            employee_task_comment: String::new(),
            tab: None,
        },
    };

    let templates = templates(&config);
    let body = templates.render(
        "status_form.html",
        &[
            ("client", escape(&task.client_name).as_str()),
            ("category", escape(&task.task_category).as_str()),
            ("task_name", escape(&task.task_name).as_str()),
            ("deadline", escape(&task.deadline_display()).as_str()),
            ("approval", task.approval_status.as_str()),
            ("action", format!("/employee/tasks/{}/status", task_id).as_str()),
            ("tab", view.key()),
            ("status_options", fragments::status_options(draft.status).as_str()),
            ("updated_till", escape(&draft.updated_till).as_str()),
            ("comment", escape(&draft.employee_task_comment).as_str()),
            ("submit", fragments::submit_button("Update Task", "Updating...").as_str()),
            ("cancel", dashboard_path(view).as_str()),
        ],
    )?;
    Ok(templates.page("Update Task", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

pub async fn handle_status_update(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(task_id): Path<i64>,
    Form(form): Form<StatusUpdateForm>,
) -> AppResult<Response> {
    let view = employee_view(form.tab.as_deref());
    let back = format!("/employee/tasks/{}/edit?tab={}", task_id, view.key());
    let draft_key = status_draft(task_id);

    let task = own_task(&api, &ctx, task_id).await?;
    if !task.editable_by_assignee() {
        Notice::error(LOCKED).flash(&session).await?;
        return Ok(Redirect::to(&dashboard_path(view)).into_response());
    }
    if form.status == TaskStatus::Unrecognized {
        reject(&session, &draft_key, &form, "Please choose a valid status").await?;
        return Ok(Redirect::to(&back).into_response());
    }

    tracing::info!("Employee {} sets task {} to {}", ctx.user.id, task_id, form.status.as_str());

    let request = StatusUpdateRequest {
        id: task_id,
        status: form.status,
        updated_till: form.updated_till.trim().to_string(),
        employee_task_comment: form.employee_task_comment.trim().to_string(),
    };
    let result = api.update_status(&ctx, &request).await;
    let updated = settle(
        &session,
        &draft_key,
        &form,
        result,
        Messages::fixed("Task updated successfully", "Failed to update task"),
    )
    .await?;

    let next = if updated { dashboard_path(view) } else { back };
    Ok(Redirect::to(&next).into_response())
}

pub async fn serve_profile(
    State((_, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;
    let draft = take_draft::<ProfileForm>(&session, PROFILE_DRAFT).await?.unwrap_or_else(|| ProfileForm {
        name: ctx.user.name.clone(),
        username: ctx.user.username.clone(),
        password: String::new(),
    });

    let templates = templates(&config);
    let body = templates.render(
        "profile.html",
        &[
            ("name", escape(&draft.name).as_str()),
            ("username", escape(&draft.username).as_str()),
            ("role", ctx.user.role.as_str()),
            ("submit", fragments::submit_button("Update Profile", "Updating...").as_str()),
        ],
    )?;
    Ok(templates.page("My Profile", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

pub async fn handle_profile(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let draft = ProfileForm { password: String::new(), ..form.clone() };
    let name = form.name.trim();
    let username = form.username.trim();

    if name.is_empty() || username.is_empty() {
        reject(&session, PROFILE_DRAFT, &draft, "Name and username are required").await?;
        return Ok(Redirect::to("/employee/profile").into_response());
    }

    tracing::info!("User {} updates their profile", ctx.user.id);

    // role and id always come from the session, never from the form
    let request = UserRequest {
        id: Some(ctx.user.id),
        name: name.to_string(),
        username: username.to_string(),
        password: Some(form.password.clone()).filter(|p| !p.trim().is_empty()),
        role: ctx.user.role,
    };
    let result = api.update_user(&ctx, &request).await;
    let updated = settle(
        &session,
        PROFILE_DRAFT,
        &draft,
        result,
        Messages::fixed("Profile updated successfully", "Failed to update profile"),
    )
    .await?;

    if updated {
        ctx.with_profile(name, username).store(&session).await?;
    }
    Ok(Redirect::to("/employee/profile").into_response())
}

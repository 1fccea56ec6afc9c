use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response, Redirect},
    Extension,
};
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::{ApprovalForm, ApprovalStatus, Client, Employee, Task, TaskForm};
use crate::services::{
    api_client::TaskRequest,
    session::{take_draft, Notice, SessionContext},
    task_views,
    validation::{self, TaskRefs},
    ApiClient,
};
use crate::views::{escape, fragments, Templates};
use super::{announce, reject, settle, templates, AppState, Messages};

const ASSIGN_DRAFT: &str = "assign";

fn edit_draft(task_id: i64) -> String {
    format!("task:{}", task_id)
}

/// Client and employee pick lists, fetched concurrently. Either list may
/// fail on its own and is then shown empty.
async fn load_choices(api: &ApiClient, ctx: &SessionContext) -> (Vec<Client>, Vec<Employee>) {
    let (clients, employees) = futures::join!(api.clients(ctx), api.employees(ctx));

    let clients = clients.unwrap_or_else(|e| {
        tracing::warn!("Failed to load clients: {}", e);
        Vec::new()
    });
    let employees = employees.unwrap_or_else(|e| {
        tracing::warn!("Failed to load employees: {}", e);
        Vec::new()
    });
    (clients, employees)
}

struct TaskFormPage<'a> {
    heading: &'a str,
    action: &'a str,
    submit: &'a str,
    cancel: &'a str,
}

fn render_task_form(
    templates: &Templates,
    page: TaskFormPage<'_>,
    draft: &TaskForm,
    clients: &[Client],
    employees: &[Employee],
) -> AppResult<String> {
    let client_options: Vec<(String, String)> = clients
        .iter()
        .map(|c| (c.id.to_string(), format!("{} ({})", c.name, c.code)))
        .collect();
    let employee_options: Vec<(String, String)> = employees
        .iter()
        .map(|e| (e.id.to_string(), e.name.clone()))
        .collect();

    templates.render(
        "task_form.html",
        &[
            ("heading", page.heading),
            ("action", page.action),
            ("client_options", fragments::select_options(&client_options, &draft.client_id).as_str()),
            ("employee_options", fragments::select_options(&employee_options, &draft.assigned_to).as_str()),
            ("task_category", escape(&draft.task_category).as_str()),
            ("task_name", escape(&draft.task_name).as_str()),
            ("deadline", escape(&draft.deadline).as_str()),
            ("priority_options", fragments::priority_options(draft.priority).as_str()),
            ("submit", fragments::submit_button(page.submit, "Saving...").as_str()),
            ("cancel", page.cancel),
        ],
    )
}

fn task_request(form: &TaskForm, refs: TaskRefs, id: Option<i64>, created_by: Option<i64>) -> TaskRequest {
    TaskRequest {
        id,
        client_id: refs.client_id,
        task_category: form.task_category.trim().to_string(),
        task_name: form.task_name.trim().to_string(),
        assigned_to: refs.employee_id,
        deadline: form.deadline.trim().to_string(),
        priority: form.priority,
        created_by,
    }
}

pub async fn serve_assign_form(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;
    let draft = take_draft::<TaskForm>(&session, ASSIGN_DRAFT).await?.unwrap_or_default();
    let (clients, employees) = load_choices(&api, &ctx).await;

    let templates = templates(&config);
    let body = render_task_form(
        &templates,
        TaskFormPage {
            heading: "Assign New Task",
            action: "/admin/assign",
            submit: "Assign Task",
            cancel: "/admin",
        },
        &draft,
        &clients,
        &employees,
    )?;
    Ok(templates.page("Assign Task", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

pub async fn handle_assign(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let refs = match validation::validate_task(&form) {
        Ok(refs) => refs,
        Err(msg) => {
            reject(&session, ASSIGN_DRAFT, &form, msg).await?;
            return Ok(Redirect::to("/admin/assign").into_response());
        }
    };

    tracing::info!("Assigning task '{}' to employee {}", form.task_name.trim(), refs.employee_id);

    let request = task_request(&form, refs, None, Some(ctx.user.id));
    let result = api.create_task(&ctx, &request).await;
    let created = settle(
        &session,
        ASSIGN_DRAFT,
        &form,
        result,
        Messages::fixed("Task assigned successfully!", "Failed to create task"),
    )
    .await?;

    let next = if created { "/admin/assign/done" } else { "/admin/assign" };
    Ok(Redirect::to(next).into_response())
}

/// Confirmation after an assignment; moves on to the task list by itself.
pub async fn serve_assign_done(
    State((_, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;
    let delay = config.ui.assignment_redirect_secs;
    let next = "/admin?tab=all";

    let templates = templates(&config);
    let head = format!(r#"<meta http-equiv="refresh" content="{};url={}">"#, delay, next);
    let body = templates.render("assign_done.html", &[("delay", delay.to_string().as_str()), ("next", next)])?;
    Ok(templates
        .page_with_head("Task Assigned", Some(&ctx), notice.as_ref(), &head, &body)?
        .into_response())
}

async fn find_task(api: &ApiClient, ctx: &SessionContext, task_id: i64) -> AppResult<Task> {
    api.tasks(ctx, &[])
        .await?
        .into_iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))
}

pub async fn serve_task_edit(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(task_id): Path<i64>,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;

    let draft = match take_draft::<TaskForm>(&session, &edit_draft(task_id)).await? {
        Some(draft) => draft,
        None => {
            let task = find_task(&api, &ctx, task_id).await?;
            TaskForm {
                client_id: task.client_id.map(|id| id.to_string()).unwrap_or_default(),
                task_category: task.task_category.clone(),
                task_name: task.task_name.clone(),
                assigned_to: task.employee_id.map(|id| id.to_string()).unwrap_or_default(),
                deadline: task.deadline_input(),
                priority: task.priority(),
            }
        }
    };
    let (clients, employees) = load_choices(&api, &ctx).await;

    let action = format!("/admin/tasks/{}/edit", task_id);
    let templates = templates(&config);
    let body = render_task_form(
        &templates,
        TaskFormPage {
            heading: "Edit Task",
            action: &action,
            submit: "Update Task",
            cancel: "/admin?tab=all",
        },
        &draft,
        &clients,
        &employees,
    )?;
    Ok(templates.page("Edit Task", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

pub async fn handle_task_edit(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(task_id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let back = format!("/admin/tasks/{}/edit", task_id);
    let draft_key = edit_draft(task_id);

    let refs = match validation::validate_task(&form) {
        Ok(refs) => refs,
        Err(msg) => {
            reject(&session, &draft_key, &form, msg).await?;
            return Ok(Redirect::to(&back).into_response());
        }
    };

    tracing::info!("Updating task {}", task_id);

    let request = task_request(&form, refs, Some(task_id), None);
    let result = api.update_task(&ctx, &request).await;
    let updated = settle(
        &session,
        &draft_key,
        &form,
        result,
        Messages::api("Task updated successfully", "Failed to update task"),
    )
    .await?;

    let next = if updated { "/admin?tab=all".to_string() } else { back };
    Ok(Redirect::to(&next).into_response())
}

pub async fn serve_approvals(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
) -> AppResult<Response> {
    let notice = Notice::take(&session).await?;

    // Load failures fall through to the empty-queue message
    let tasks = api.tasks(&ctx, &[]).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load approval queue: {}", e);
        Vec::new()
    });
    let queue = task_views::approval_queue(&tasks);
    tracing::debug!("{} tasks awaiting approval", queue.len());

    let templates = templates(&config);
    let body = templates.render("approvals.html", &[("table", fragments::approval_table(&queue).as_str())])?;
    Ok(templates.page("Approvals", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

pub async fn handle_approval(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(task_id): Path<i64>,
    Form(form): Form<ApprovalForm>,
) -> AppResult<Response> {
    let messages = match form.approval_status {
        ApprovalStatus::Approved => Messages::fixed("Task approved successfully", "Operation failed"),
        ApprovalStatus::Rejected => Messages::fixed("Task rejected successfully", "Operation failed"),
        other => {
            tracing::warn!("Refusing approval decision {:?} for task {}", other, task_id);
            return Err(AppError::Validation("Choose approve or reject".into()));
        }
    };

    tracing::info!("Setting approval of task {} to {}", task_id, form.approval_status.as_str());

    let result = api.approve_task(&ctx, task_id, form.approval_status).await;
    announce(&session, result, messages).await?;
    Ok(Redirect::to("/admin/approvals").into_response())
}

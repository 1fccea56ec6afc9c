use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Response, Redirect},
    Extension,
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::{ListQuery, TabForm};
use crate::services::{
    listing,
    session::{Notice, SessionContext},
    task_views::{self, TaskView},
};
use crate::views::fragments::{self, RowActions};
use super::{announce, list_state, templates, AppState, Messages};

const ADMIN_TABS: [(TaskView, &str); 5] = [
    (TaskView::Pending, "Pending"),
    (TaskView::InProgress, "In Progress"),
    (TaskView::Completed, "Completed"),
    (TaskView::All, "All Tasks"),
    (TaskView::Unrecognized, "Unrecognized"),
];

fn admin_view(tab: Option<&str>) -> TaskView {
    tab.and_then(TaskView::parse)
        .filter(|v| TaskView::ADMIN_TABS.contains(v))
        .unwrap_or(TaskView::Pending)
}

pub async fn serve_admin_dashboard(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let view = admin_view(query.tab.as_deref());
    tracing::info!("Admin dashboard, tab {}", view.key());

    let notice = Notice::take(&session).await?;

    // A failed load still renders the page, with a dismissible banner
    let (tasks, banner) = match api.tasks(&ctx, &[]).await {
        Ok(tasks) => (tasks, String::new()),
        Err(e) => {
            tracing::warn!("Failed to load tasks: {}", e);
            (Vec::new(), fragments::banner(&e.user_message("Failed to load tasks")))
        }
    };

    let (visible, stats) = task_views::derive(&tasks, view);
    let state = list_state(&query);
    let matches = listing::search_tasks(&visible, state.term());
    let page = listing::paginate(&matches, state.page(), config.ui.page_size);

    tracing::debug!(
        "Showing page {} of {} ({} of {} tasks)",
        page.number, page.total_pages, page.items.len(), tasks.len()
    );

    let templates = templates(&config);
    let content = templates.render(
        "task_list.html",
        &[
            ("title", view.title()),
            ("search", fragments::search_form("/admin", view.key(), &state).as_str()),
            ("refresh", format!("/admin?tab={}", view.key()).as_str()),
            ("table", fragments::task_table(page.items, RowActions::Admin, view.key()).as_str()),
            ("pagination", fragments::pagination("/admin", view.key(), state.term(), &page).as_str()),
        ],
    )?;
    let body = templates.render(
        "dashboard.html",
        &[
            ("stats", fragments::stats_cards(&stats).as_str()),
            ("tabs", fragments::tabs("/admin", &ADMIN_TABS, view).as_str()),
            ("banner", banner.as_str()),
            ("content", content.as_str()),
        ],
    )?;

    Ok(templates.page("Admin Dashboard", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

pub async fn delete_task(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(task_id): Path<i64>,
    Form(form): Form<TabForm>,
) -> AppResult<Response> {
    tracing::info!("Deleting task {}", task_id);

    let result = api.delete_task(&ctx, task_id).await;
    announce(&session, result, Messages::api("Task deleted successfully", "Failed to delete task")).await?;

    let tab = admin_view(form.tab.as_deref());
    Ok(Redirect::to(&format!("/admin?tab={}", tab.key())).into_response())
}

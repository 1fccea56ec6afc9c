// HTML pieces shared by several pages. Every value taken from the API or the
// user goes through `escape`.
use crate::models::{Client, ClientReport, Priority, Role, Task, TaskStatus, User};
use crate::services::listing::{ListState, Page};
use crate::services::session::{Notice, NoticeKind, SessionContext};
use crate::services::task_views::{TaskStats, TaskView};
use super::escape;

pub fn header(ctx: &SessionContext) -> String {
    let (title, links): (&str, &[(&str, &str)]) = if ctx.is_admin() {
        (
            "Admin Dashboard",
            &[
                ("/admin", "Tasks"),
                ("/admin/assign", "Assign Task"),
                ("/admin/approvals", "Approvals"),
                ("/admin/reports", "Reports"),
                ("/admin/users", "User Management"),
                ("/admin/clients", "Client Management"),
            ],
        )
    } else {
        ("Employee Dashboard", &[("/employee", "My Tasks"), ("/employee/profile", "My Profile")])
    };

    let nav = links
        .iter()
        .map(|(href, label)| format!(r#"<a href="{}" class="nav-item">{}</a>"#, href, label))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<header class="dashboard-header">
            <div class="header-content">
                <h1>{}</h1>
                <nav class="header-nav">{}</nav>
                <div class="user-info">
                    <div class="user-avatar">
                        <span class="avatar-icon">{}</span>
                        <span class="user-name">{}</span>
                    </div>
                    <a href="/logout" class="logout-btn">Logout</a>
                </div>
            </div>
        </header>"#,
        title,
        nav,
        escape(&ctx.user.initial()),
        escape(&ctx.user.name)
    )
}

pub fn notice(notice: &Notice) -> String {
    let kind = match notice.kind {
        NoticeKind::Success => "success",
        NoticeKind::Error => "error",
    };
    format!(
        r#"<div class="toast toast-{}" role="alert">
            <span>{}</span>
            <button type="button" class="toast-close" onclick="this.parentElement.remove()">&times;</button>
        </div>"#,
        kind,
        escape(&notice.message)
    )
}

pub fn banner(message: &str) -> String {
    format!(
        r#"<div class="error-message">{}<button type="button" onclick="this.parentElement.remove()">&times;</button></div>"#,
        escape(message)
    )
}

pub fn stats_cards(stats: &TaskStats) -> String {
    let cards = [
        ("", "Total Tasks", stats.total),
        (" pending", "Pending", stats.pending),
        (" progress", "In Progress", stats.in_progress),
        (" completed", "Completed", stats.completed),
    ];
    let cards = cards
        .iter()
        .map(|(class, label, count)| {
            format!(
                r#"<div class="stat-card{}"><h3>{}</h3><p class="stat-number">{}</p></div>"#,
                class, label, count
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(r#"<div class="stats-cards">{}</div>"#, cards)
}

pub fn tabs(base: &str, tabs: &[(TaskView, &str)], active: TaskView) -> String {
    tabs.iter()
        .map(|(view, label)| {
            let class = if *view == active { "tab active" } else { "tab" };
            format!(r#"<a href="{}?tab={}" class="{}">{}</a>"#, base, view.key(), class, label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn list_href(base: &str, tab: &str, term: &str, page: usize) -> String {
    format!(
        "{}?tab={}&amp;q={}&amp;prev_q={}&amp;page={}",
        base,
        urlencoding::encode(tab),
        urlencoding::encode(term),
        urlencoding::encode(term),
        page
    )
}

/// Search box that remembers which term and page it was rendered for.
pub fn search_form(base: &str, tab: &str, state: &ListState) -> String {
    format!(
        r#"<form action="{}" method="get" class="search-form">
            <input type="hidden" name="tab" value="{}">
            <input type="hidden" name="prev_q" value="{}">
            <input type="hidden" name="page" value="{}">
            <input type="text" name="q" value="{}" placeholder="Search tasks..." class="search-input">
        </form>"#,
        base,
        escape(tab),
        escape(state.term()),
        state.page(),
        escape(state.term())
    )
}

pub fn pagination<T>(base: &str, tab: &str, term: &str, page: &Page<'_, T>) -> String {
    if page.total_pages <= 1 {
        return String::new();
    }
    let link = |enabled: bool, target: usize, label: &str| {
        if enabled {
            format!(r#"<a href="{}" class="pagination-btn">{}</a>"#, list_href(base, tab, term, target), label)
        } else {
            format!(r#"<button class="pagination-btn" disabled>{}</button>"#, label)
        }
    };
    let mut previous = ListState::new(term, page.number);
    previous.previous();
    let mut next = ListState::new(term, page.number);
    next.next(page.total_pages);

    format!(
        r#"<div class="pagination">{}<span class="pagination-info">Page {} of {} ({} tasks)</span>{}</div>"#,
        link(page.has_previous(), previous.page(), "Previous"),
        page.number,
        page.total_pages,
        page.total_items,
        link(page.has_next(), next.page(), "Next")
    )
}

pub fn submit_button(label: &str, busy: &str) -> String {
    format!(
        r#"<button type="submit" class="submit-btn" data-busy="{}">{}</button>"#,
        escape(busy),
        escape(label)
    )
}

/// Small POST form behind a confirmation prompt.
pub fn delete_button(action: &str, confirm: &str, hidden: &[(&str, &str)]) -> String {
    let fields = hidden
        .iter()
        .map(|(name, value)| format!(r#"<input type="hidden" name="{}" value="{}">"#, name, escape(value)))
        .collect::<String>();
    format!(
        r#"<form action="{}" method="post" class="inline-form" onsubmit="return confirm('{}')">{}<button type="submit" class="delete-btn">Delete</button></form>"#,
        action,
        escape(confirm),
        fields
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowActions {
    Admin,
    Employee,
}

fn or_dash(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_else(|| "-".to_string())
}

fn task_row(task: &Task, actions: RowActions, tab: &str) -> String {
    let action = match actions {
        RowActions::Admin => format!(
            r#"<a href="/admin/tasks/{id}/edit" class="edit-btn">Edit</a>{}"#,
            delete_button(
                &format!("/admin/tasks/{}/delete", task.id),
                "Are you sure you want to delete this task?",
                &[("tab", tab)]
            ),
            id = task.id
        ),
        RowActions::Employee if task.editable_by_assignee() => format!(
            r#"<a href="/employee/tasks/{}/edit?tab={}" class="edit-btn">Update</a>"#,
            task.id,
            urlencoding::encode(tab)
        ),
        RowActions::Employee => r#"<span class="locked">Approved</span>"#.to_string(),
    };

    format!(
        r#"<tr>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td><span class="priority-badge priority-{p}">{p}</span></td>
            <td>{}</td>
            <td><span class="badge {}">{}</span></td>
            <td>{}</td>
            <td>{}</td>
            <td><span class="badge {}">{}</span></td>
            <td class="action-cell">{}</td>
        </tr>"#,
        escape(&task.client_name),
        escape(&task.task_category),
        escape(&task.task_name),
        escape(&task.employee_name),
        escape(&task.deadline_display()),
        task.status.badge_class(),
        task.status.label(),
        or_dash(task.updated_till.as_deref()),
        or_dash(task.employee_task_comment.as_deref()),
        task.approval_status.badge_class(),
        task.approval_status.as_str(),
        action,
        p = task.priority().as_str()
    )
}

pub fn task_table(tasks: &[&Task], actions: RowActions, tab: &str) -> String {
    if tasks.is_empty() {
        return r#"<p class="no-tasks">No tasks found</p>"#.to_string();
    }
    let rows = tasks.iter().map(|t| task_row(t, actions, tab)).collect::<Vec<_>>().join("\n");
    format!(
        r#"<div class="table-container">
            <table class="tasks-table">
                <thead>
                    <tr>
                        <th>Client</th><th>Category</th><th>Task Name</th><th>Assigned To</th>
                        <th>Priority</th><th>Deadline</th><th>Status</th><th>Updated Till</th>
                        <th>Employee comment</th><th>Approval</th><th>Actions</th>
                    </tr>
                </thead>
                <tbody>{}</tbody>
            </table>
        </div>"#,
        rows
    )
}

pub fn approval_table(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return r#"<p class="no-tasks">No tasks pending approval</p>"#.to_string();
    }
    let decision = |id: i64, value: &str, label: &str, class: &str| {
        format!(
            r#"<form action="/admin/approvals/{}" method="post" class="inline-form"><input type="hidden" name="approval_status" value="{}"><button type="submit" class="{}" data-busy="Processing...">{}</button></form>"#,
            id, value, class, label
        )
    };
    let rows = tasks
        .iter()
        .map(|t| {
            format!(
                r#"<tr>
                    <td>{}</td><td>{}</td><td>{}</td><td>{}</td>
                    <td>{}</td><td>{}</td><td>{}</td>
                    <td><span class="badge {}">{}</span></td>
                    <td class="action-cell">{}{}</td>
                </tr>"#,
                escape(&t.client_name),
                escape(&t.task_category),
                escape(&t.task_name),
                escape(&t.employee_name),
                or_dash(t.updated_till.as_deref()),
                or_dash(t.employee_task_comment.as_deref()),
                escape(&t.updated_display()),
                t.status.badge_class(),
                t.status.label(),
                decision(t.id, "approved", "Approve", "approve-btn"),
                decision(t.id, "rejected", "Reject", "reject-btn")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<table class="tasks-table">
            <thead><tr><th>Client</th><th>Category</th><th>Task Name</th><th>Employee</th><th>Updated Till</th><th>Comment</th><th>Submitted</th><th>Status</th><th>Actions</th></tr></thead>
            <tbody>{}</tbody>
        </table>"#,
        rows
    )
}

pub fn client_table(clients: &[&Client]) -> String {
    if clients.is_empty() {
        return r#"<p class="no-clients">No clients found</p>"#.to_string();
    }
    let rows = clients
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td>{}</td><td><span class="code-badge">{}</span></td><td class="action-buttons"><a href="/admin/clients/{}/edit" class="edit-btn">Edit</a>{}</td></tr>"#,
                escape(&c.name),
                escape(&c.code),
                c.id,
                delete_button(
                    &format!("/admin/clients/{}/delete", c.id),
                    "Are you sure you want to delete this client?",
                    &[]
                )
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<table class="clients-table"><thead><tr><th>Client Name</th><th>Client Code/GSTIN</th><th>Actions</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

pub fn user_table(users: &[User]) -> String {
    if users.is_empty() {
        return r#"<p class="no-users">No users found</p>"#.to_string();
    }
    let rows = users
        .iter()
        .map(|u| {
            format!(
                r#"<tr><td>{}</td><td>{}</td><td><span class="role-badge role-{role}">{role}</span></td><td class="action-buttons"><a href="/admin/users/{}/edit" class="edit-btn">Edit</a>{}</td></tr>"#,
                escape(&u.name),
                escape(&u.username),
                u.id,
                delete_button(
                    &format!("/admin/users/{}/delete", u.id),
                    "Are you sure you want to delete this user?",
                    &[]
                ),
                role = u.role.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<table class="users-table"><thead><tr><th>Name</th><th>Username</th><th>Role</th><th>Actions</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

pub fn report(report: &ClientReport, client_id: i64) -> String {
    let categories = report
        .categories
        .iter()
        .map(|category| {
            let rows = category
                .tasks
                .iter()
                .map(|t| {
                    format!(
                        r#"<tr><td>{}</td><td><span class="badge {}">{}</span></td><td>{}</td><td>{}</td><td><span class="badge {}">{}</span></td></tr>"#,
                        escape(&t.task_name),
                        t.status.badge_class(),
                        t.status.label(),
                        escape(t.updated_till.as_deref().unwrap_or("Not updated")),
                        escape(&t.employee_name),
                        t.approval_status.badge_class(),
                        t.approval_status.as_str()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                r#"<section class="report-category"><h4>{}</h4><table class="report-table"><thead><tr><th>Task</th><th>Status</th><th>Updated Till</th><th>Assigned To</th><th>Approval</th></tr></thead><tbody>{}</tbody></table></section>"#,
                escape(&category.name),
                rows
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = if report.categories.is_empty() {
        r#"<p class="no-tasks">No tasks found for this client</p>"#.to_string()
    } else {
        categories
    };

    format!(
        r#"<div class="report-content">
            <div class="report-header">
                <h3>{}</h3>
                <p>Client Code: <span class="code-badge">{}</span></p>
                <p>Generated At: {}</p>
                <a href="/admin/reports/{}/download" class="download-btn">Download Report</a>
            </div>
            {}
        </div>"#,
        escape(&report.client.name),
        escape(&report.client.code),
        escape(&crate::models::format_timestamp(&report.generated_at)),
        client_id,
        body
    )
}

pub fn select_options(options: &[(String, String)], selected: &str) -> String {
    options
        .iter()
        .map(|(value, label)| {
            let mark = if value == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, escape(value), mark, escape(label))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn priority_options(selected: Priority) -> String {
    let options: Vec<(String, String)> = Priority::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), capitalize(p.as_str())))
        .collect();
    select_options(&options, selected.as_str())
}

pub fn status_options(selected: TaskStatus) -> String {
    let options: Vec<(String, String)> = TaskStatus::KNOWN
        .iter()
        .map(|s| (s.as_str().to_string(), capitalize(&s.label())))
        .collect();
    select_options(&options, selected.as_str())
}

pub fn role_options(selected: Role) -> String {
    let options = vec![
        ("employee".to_string(), "Employee".to_string()),
        ("admin".to_string(), "Admin".to_string()),
    ];
    select_options(&options, selected.as_str())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_task, ApprovalStatus};
    use crate::services::listing::paginate;

    #[test]
    fn pagination_disables_buttons_at_bounds() {
        let items: Vec<u32> = (1..=25).collect();

        let first = pagination("/admin", "all", "", &paginate(&items, 1, 10));
        assert!(first.contains(r#"<button class="pagination-btn" disabled>Previous</button>"#));
        assert!(first.contains("page=2"));
        assert!(first.contains("Page 1 of 3 (25 tasks)"));

        let last = pagination("/admin", "all", "", &paginate(&items, 3, 10));
        assert!(last.contains(r#"<button class="pagination-btn" disabled>Next</button>"#));
        assert!(last.contains("page=2"));

        assert_eq!(pagination("/admin", "all", "", &paginate(&items[..10], 1, 10)), "");
    }

    #[test]
    fn employee_rows_lock_approved_tasks() {
        let approved = sample_task(1, TaskStatus::Completed, ApprovalStatus::Approved);
        let rejected = sample_task(2, TaskStatus::InProgress, ApprovalStatus::Rejected);

        let html = task_table(&[&approved, &rejected], RowActions::Employee, "in_progress");
        assert!(!html.contains("/employee/tasks/1/edit"));
        assert!(html.contains("/employee/tasks/2/edit?tab=in_progress"));
        assert!(html.contains(r#"<span class="locked">Approved</span>"#));
    }

    #[test]
    fn task_cells_are_escaped_and_defaulted() {
        let mut task = sample_task(1, TaskStatus::InProgress, ApprovalStatus::Pending);
        task.task_name = "<script>".into();
        let html = task_table(&[&task], RowActions::Admin, "all");
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("priority-medium"));
        assert!(html.contains("in progress"));
        assert!(html.contains("/admin/tasks/1/delete"));
    }

    #[test]
    fn empty_table_shows_empty_state() {
        assert!(task_table(&[], RowActions::Admin, "all").contains("No tasks found"));
        assert!(client_table(&[]).contains("No clients found"));
    }

    #[test]
    fn options_mark_selection() {
        let html = priority_options(Priority::High);
        assert!(html.contains(r#"<option value="high" selected>High</option>"#));
        assert!(html.contains(r#"<option value="low">Low</option>"#));
        assert!(status_options(TaskStatus::InProgress).contains(r#"value="in_progress" selected>In progress"#));
    }

    #[test]
    fn search_form_carries_current_term_and_page() {
        let html = search_form("/admin", "all", &ListState::new("gst", 3));
        assert!(html.contains(r#"name="prev_q" value="gst""#));
        assert!(html.contains(r#"name="page" value="3""#));
    }
}

use serde::{Deserialize, Serialize};
use super::{ApprovalStatus, Priority, Role, TaskStatus};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ClientForm {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl UserForm {
    /// Drafts are kept between requests, passwords are not.
    pub fn without_password(&self) -> Self {
        Self { password: String::new(), ..self.clone() }
    }
}

/// Shared by task assignment and the admin task editor. Select values stay as
/// strings so an unselected option survives a failed submission.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct TaskForm {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub task_category: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatusUpdateForm {
    pub status: TaskStatus,
    #[serde(default)]
    pub updated_till: String,
    #[serde(default)]
    pub employee_task_comment: String,
    /// Dashboard tab to return to.
    #[serde(default)]
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalForm {
    pub approval_status: ApprovalStatus,
}

/// Query string of a searchable, paginated list. `prev_q` carries the term the
/// current page was rendered with, so a changed term can be detected.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub tab: Option<String>,
    pub q: Option<String>,
    pub prev_q: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReportQuery {
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    pub error: Option<String>,
}

/// Hidden tab field of row actions, used to land back on the same tab.
#[derive(Debug, Deserialize, Default)]
pub struct TabForm {
    pub tab: Option<String>,
}

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use super::de;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    // Anything the API sends outside the three known values
    #[default]
    #[serde(other)]
    Unrecognized,
}

impl TaskStatus {
    pub const KNOWN: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Unrecognized => "unknown",
        }
    }

    pub fn label(self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            TaskStatus::InProgress => "badge-progress",
            TaskStatus::Completed => "badge-completed",
            TaskStatus::Pending | TaskStatus::Unrecognized => "badge-pending",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unrecognized,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Unrecognized => "unknown",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "badge-approval-approved",
            ApprovalStatus::Rejected => "badge-approval-rejected",
            ApprovalStatus::Pending | ApprovalStatus::Unrecognized => "badge-approval-pending",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    High,
    #[default]
    #[serde(other)]
    Medium,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A task as returned by the task API. Only ever read; mutations go through
/// dedicated request payloads.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::optional_id")]
    pub client_id: Option<i64>,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub client_name: String,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub task_category: String,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub task_name: String,
    #[serde(default, deserialize_with = "de::optional_id")]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub employee_name: String,
    // null or missing status lands in the unrecognized bucket, null approval reads as pending
    #[serde(default, deserialize_with = "de::lenient_enum")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "de::lenient_enum")]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub updated_till: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub employee_task_comment: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub updated_at: Option<String>,
}

impl Task {
    pub fn priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    /// Approved work is locked for the assigned employee.
    pub fn editable_by_assignee(&self) -> bool {
        self.approval_status != ApprovalStatus::Approved
    }

    pub fn deadline_display(&self) -> String {
        self.deadline
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string())
    }

    /// When the task last changed, which for the approval queue is when the
    /// work was handed in.
    pub fn updated_display(&self) -> String {
        self.updated_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string())
    }

    /// Deadline in the shape a `datetime-local` input expects, for edit forms.
    pub fn deadline_input(&self) -> String {
        self.deadline
            .as_deref()
            .and_then(parse_timestamp)
            .map(|t| t.format("%Y-%m-%dT%H:%M").to_string())
            .unwrap_or_default()
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.naive_local());
    }
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Renders API timestamps as `YYYY-MM-DD HH:MM`; unparseable values are shown as sent.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
pub(crate) fn sample(id: i64, status: TaskStatus, approval: ApprovalStatus) -> Task {
    Task {
        id,
        client_id: Some(1),
        client_name: "Acme Traders".into(),
        task_category: "GST Filing".into(),
        task_name: format!("Task {}", id),
        employee_id: Some(7),
        employee_name: "Ravi".into(),
        status,
        approval_status: approval,
        priority: None,
        deadline: None,
        updated_till: None,
        employee_task_comment: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_api_task_with_string_ids() {
        let task: Task = serde_json::from_value(json!({
            "id": "12",
            "clientId": "3",
            "clientName": "Acme Traders",
            "taskCategory": "Audit",
            "taskName": "Q3 ledger review",
            "employeeId": 7,
            "employeeName": "Ravi",
            "status": "in_progress",
            "approvalStatus": "rejected",
            "priority": "high",
            "deadline": "2025-03-01 17:30:00",
            "updatedTill": "",
            "employeeTaskComment": null,
            "createdBy": "1"
        }))
        .unwrap();

        assert_eq!(task.id, 12);
        assert_eq!(task.client_id, Some(3));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.approval_status, ApprovalStatus::Rejected);
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.updated_till, None);
        assert_eq!(task.deadline_display(), "2025-03-01 17:30");
        assert_eq!(task.deadline_input(), "2025-03-01T17:30");
    }

    #[test]
    fn unknown_enumerations_are_kept_as_unrecognized() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "status": "on_hold",
            "approvalStatus": "escalated",
            "priority": "urgent"
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Unrecognized);
        assert_eq!(task.approval_status, ApprovalStatus::Unrecognized);
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.status.badge_class(), "badge-pending");
        assert_eq!(task.approval_status.badge_class(), "badge-approval-pending");
    }

    #[test]
    fn missing_optional_fields_default() {
        let task: Task = serde_json::from_value(json!({"id": 5, "status": "pending", "clientName": null})).unwrap();
        assert_eq!(task.client_name, "");
        assert_eq!(task.approval_status, ApprovalStatus::Pending);
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.deadline_display(), "-");
    }

    #[test]
    fn approved_tasks_are_locked_for_the_assignee() {
        assert!(!sample(1, TaskStatus::Completed, ApprovalStatus::Approved).editable_by_assignee());
        assert!(sample(2, TaskStatus::Completed, ApprovalStatus::Pending).editable_by_assignee());
        assert!(sample(3, TaskStatus::InProgress, ApprovalStatus::Rejected).editable_by_assignee());
    }

    #[test]
    fn status_label_replaces_underscore() {
        assert_eq!(TaskStatus::InProgress.label(), "in progress");
        assert_eq!(TaskStatus::Completed.label(), "completed");
    }

    #[test]
    fn timestamps_render_to_the_minute() {
        let mut task = sample(4, TaskStatus::Completed, ApprovalStatus::Pending);
        assert_eq!(task.updated_display(), "-");

        task.updated_at = Some("2025-02-01T10:05:30Z".into());
        assert_eq!(task.updated_display(), "2025-02-01 10:05");

        task.deadline = Some("2025-03-31".into());
        assert_eq!(task.deadline_input(), "2025-03-31T00:00");
    }

    #[test]
    fn null_or_missing_status_does_not_fail_decoding() {
        let task: Task = serde_json::from_value(json!({"id": 1, "status": null, "approvalStatus": null})).unwrap();
        assert_eq!(task.status, TaskStatus::Unrecognized);
        assert_eq!(task.approval_status, ApprovalStatus::Pending);

        let task: Task = serde_json::from_value(json!({"id": 2, "approvalStatus": 3})).unwrap();
        assert_eq!(task.status, TaskStatus::Unrecognized);
        assert_eq!(task.approval_status, ApprovalStatus::Pending);

        let task: Task = serde_json::from_value(json!({"id": 3, "status": "on_hold", "approvalStatus": "approved"})).unwrap();
        assert_eq!(task.status, TaskStatus::Unrecognized);
        assert_eq!(task.approval_status, ApprovalStatus::Approved);
    }
}

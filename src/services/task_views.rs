//! Derivation of dashboard tabs and stats cards from a task collection.
//!
//! Every function here is pure: the output depends only on the slice passed
//! in, and filtered views borrow from it in the original order.
use crate::models::{ApprovalStatus, Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskView {
    Pending,
    InProgress,
    Completed,
    All,
    /// Employee default: open work that has not been sent back.
    Assigned,
    /// Tasks carrying a status or approval value outside the known sets.
    Unrecognized,
}

impl TaskView {
    pub const ADMIN_TABS: [TaskView; 5] = [
        TaskView::Pending,
        TaskView::InProgress,
        TaskView::Completed,
        TaskView::All,
        TaskView::Unrecognized,
    ];

    pub const EMPLOYEE_TABS: [TaskView; 4] = [
        TaskView::Assigned,
        TaskView::InProgress,
        TaskView::Completed,
        TaskView::Pending,
    ];

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "pending" => Some(TaskView::Pending),
            "in_progress" => Some(TaskView::InProgress),
            "completed" => Some(TaskView::Completed),
            "all" => Some(TaskView::All),
            "assigned" => Some(TaskView::Assigned),
            "unrecognized" => Some(TaskView::Unrecognized),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TaskView::Pending => "pending",
            TaskView::InProgress => "in_progress",
            TaskView::Completed => "completed",
            TaskView::All => "all",
            TaskView::Assigned => "assigned",
            TaskView::Unrecognized => "unrecognized",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TaskView::Pending => "Pending Tasks",
            TaskView::InProgress => "In Progress Tasks",
            TaskView::Completed => "Completed Tasks",
            TaskView::All => "All Tasks",
            TaskView::Assigned => "Assigned Tasks",
            TaskView::Unrecognized => "Unrecognized Tasks",
        }
    }

    pub fn admits(self, task: &Task) -> bool {
        let rejected = task.approval_status == ApprovalStatus::Rejected;
        match self {
            TaskView::Pending => task.status == TaskStatus::Pending && !rejected,
            // Rejected work resurfaces here whatever its stored status
            TaskView::InProgress => task.status == TaskStatus::InProgress || rejected,
            TaskView::Completed => task.status == TaskStatus::Completed && !rejected,
            TaskView::All => true,
            TaskView::Assigned => {
                matches!(task.status, TaskStatus::Pending | TaskStatus::InProgress) && !rejected
            }
            TaskView::Unrecognized => {
                task.status == TaskStatus::Unrecognized
                    || task.approval_status == ApprovalStatus::Unrecognized
            }
        }
    }
}

/// Counts shown on the stats cards.
///
/// `pending` and `in_progress` count by status alone, while `completed`
/// leaves out rejected tasks to match the completed tab. A rejected pending
/// task is therefore counted as pending yet listed under in-progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            TaskStats { total: tasks.len(), ..TaskStats::default() },
            |mut stats, task| {
                match task.status {
                    TaskStatus::Pending => stats.pending += 1,
                    TaskStatus::InProgress => stats.in_progress += 1,
                    TaskStatus::Completed if task.approval_status != ApprovalStatus::Rejected => {
                        stats.completed += 1
                    }
                    _ => {}
                }
                stats
            },
        )
    }
}

pub fn filter_tasks(tasks: &[Task], view: TaskView) -> Vec<&Task> {
    tasks.iter().filter(|t| view.admits(t)).collect()
}

/// Filtered view and stats in one pass over the caller's collection.
pub fn derive(tasks: &[Task], view: TaskView) -> (Vec<&Task>, TaskStats) {
    (filter_tasks(tasks, view), TaskStats::from_tasks(tasks))
}

/// Work reported done by employees and waiting for an admin decision.
pub fn approval_queue(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed && t.approval_status == ApprovalStatus::Pending)
        .collect()
}

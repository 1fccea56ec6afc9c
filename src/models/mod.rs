mod de;
mod task;
mod client;
mod user;
mod forms;
mod envelope;
mod report;

pub use task::{Task, TaskStatus, ApprovalStatus, Priority, format_timestamp};
#[cfg(test)]
pub(crate) use task::sample as sample_task;
pub use client::Client;
pub use user::{User, Role, Employee};
pub use forms::{
    LoginForm, ClientForm, UserForm, TaskForm, StatusUpdateForm, ProfileForm,
    ApprovalForm, ListQuery, ReportQuery, LoginQuery, TabForm,
};
pub use envelope::Envelope;
pub use report::ClientReport;

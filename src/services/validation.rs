// Local checks that run before anything is sent to the task API. Each
// validator stops at the first failing rule.
use crate::models::{ClientForm, TaskForm, UserForm};

pub const MAX_CLIENT_CODE_LEN: usize = 15;

/// Returns the trimmed name and code, or the first rule that fails.
pub fn validate_client(form: &ClientForm) -> Result<ClientForm, &'static str> {
    let name = form.name.trim();
    let code = form.code.trim();

    if name.is_empty() {
        return Err("Client name is required");
    }
    if name.chars().count() < 2 {
        return Err("Name must be at least 2 characters");
    }
    if code.is_empty() {
        return Err("Client code is required");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Code must be uppercase alphanumeric");
    }
    if code.len() > MAX_CLIENT_CODE_LEN {
        return Err("Code cannot exceed 15 characters");
    }

    Ok(ClientForm { name: name.to_string(), code: code.to_string() })
}

/// Ids parsed out of a task form's select fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRefs {
    pub client_id: i64,
    pub employee_id: i64,
}

pub fn validate_task(form: &TaskForm) -> Result<TaskRefs, &'static str> {
    let client_id = form.client_id.trim().parse::<i64>().map_err(|_| "Please select a client")?;
    if form.task_category.trim().is_empty() {
        return Err("Task category is required");
    }
    if form.task_name.trim().is_empty() {
        return Err("Task name is required");
    }
    let employee_id = form.assigned_to.trim().parse::<i64>().map_err(|_| "Please select an employee")?;

    Ok(TaskRefs { client_id, employee_id })
}

/// A new user needs a password; on edit a blank one keeps the stored password.
pub fn validate_user(form: &UserForm, creating: bool) -> Result<(), &'static str> {
    if form.name.trim().is_empty() {
        return Err("Name is required");
    }
    if form.username.trim().is_empty() {
        return Err("Username is required");
    }
    if creating && form.password.is_empty() {
        return Err("Password is required");
    }
    Ok(())
}

pub fn validate_login(username: &str, password: &str) -> Result<(), &'static str> {
    if username.trim().is_empty() || password.is_empty() {
        return Err("Username and password are required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, code: &str) -> ClientForm {
        ClientForm { name: name.into(), code: code.into() }
    }

    #[test]
    fn accepts_uppercase_alphanumeric_code() {
        assert_eq!(validate_client(&client("Acme", "ABC123")), Ok(client("Acme", "ABC123")));
    }

    #[test]
    fn rejects_bad_codes() {
        assert_eq!(validate_client(&client("Acme", "abc123")), Err("Code must be uppercase alphanumeric"));
        assert_eq!(validate_client(&client("Acme", "AB-12")), Err("Code must be uppercase alphanumeric"));
        assert_eq!(
            validate_client(&client("Acme", "ABCDEFGHIJ123456")),
            Err("Code cannot exceed 15 characters")
        );
        assert!(validate_client(&client("Acme", "27AAPFU0939F1ZV")).is_ok());
    }

    #[test]
    fn first_failing_rule_wins() {
        assert_eq!(validate_client(&client("  ", "bad code!")), Err("Client name is required"));
        assert_eq!(validate_client(&client(" A ", "")), Err("Name must be at least 2 characters"));
        assert_eq!(validate_client(&client("Acme", "   ")), Err("Client code is required"));
    }

    #[test]
    fn values_are_trimmed() {
        assert_eq!(validate_client(&client("  Acme Ltd ", " GST99 ")), Ok(client("Acme Ltd", "GST99")));
    }

    #[test]
    fn task_form_requires_selections() {
        let mut form = TaskForm {
            client_id: "3".into(),
            task_category: "Audit".into(),
            task_name: "Stock audit".into(),
            assigned_to: "".into(),
            ..TaskForm::default()
        };
        assert_eq!(validate_task(&form), Err("Please select an employee"));

        form.assigned_to = "7".into();
        assert_eq!(validate_task(&form), Ok(TaskRefs { client_id: 3, employee_id: 7 }));

        form.client_id.clear();
        assert_eq!(validate_task(&form), Err("Please select a client"));
    }

    #[test]
    fn password_only_required_on_create() {
        let form = UserForm {
            name: "Asha".into(),
            username: "asha@office.in".into(),
            ..UserForm::default()
        };
        assert_eq!(validate_user(&form, true), Err("Password is required"));
        assert_eq!(validate_user(&form, false), Ok(()));
        assert_eq!(
            validate_user(&UserForm { name: " ".into(), ..form }, false),
            Err("Name is required")
        );
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login("a@b.in", "").is_err());
        assert!(validate_login(" ", "pw").is_err());
        assert!(validate_login("a@b.in", "pw").is_ok());
    }
}

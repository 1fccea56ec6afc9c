// In-process stand-in for the remote task API, used by client and handler tests.
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use axum::{
    extract::{Query, Request, State},
    middleware::{self, Next},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use crate::models::{Role, User};
use crate::services::session::SessionContext;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const EMPLOYEE_TOKEN: &str = "employee-token";

pub fn admin_context() -> SessionContext {
    SessionContext {
        token: ADMIN_TOKEN.into(),
        user: User { id: 1, name: "Meera".into(), username: "admin@office.in".into(), role: Role::Admin },
    }
}

pub fn employee_context() -> SessionContext {
    SessionContext {
        token: EMPLOYEE_TOKEN.into(),
        user: User { id: 7, name: "Ravi".into(), username: "ravi@office.in".into(), role: Role::Employee },
    }
}

#[derive(Default)]
struct StubState {
    tasks: Mutex<Vec<Value>>,
    bodies: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

type Shared = State<Arc<StubState>>;

pub struct StubApi {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubApi {
    pub async fn start() -> Self {
        let state = Arc::new(StubState {
            tasks: Mutex::new(seed_tasks()),
            ..StubState::default()
        });

        let app = Router::new()
            .route("/login.php", post(login))
            .route("/tasks.php", get(tasks))
            .route("/get_employee_tasks.php", get(employee_tasks))
            .route("/update_status.php", post(update_status))
            .route("/approve_task.php", post(approve_task))
            .route("/delete_task.php", delete(delete_task))
            .route("/client_report.php", get(client_report))
            .route("/clients.php", get(clients))
            .route("/get_client.php", get(get_client))
            .route("/create_client.php", post(create_client))
            .route("/employees.php", get(employees))
            .route("/get_users.php", get(users))
            .route("/get_user.php", get(get_user))
            .route("/create_task.php", post(|s: Shared, h: HeaderMap, Json(b): Json<Value>| async move {
                accept(&s, &h, "create_task.php", b, "Task created successfully")
            }))
            .route("/update_task.php", post(|s: Shared, h: HeaderMap, Json(b): Json<Value>| async move {
                accept(&s, &h, "update_task.php", b, "Task updated successfully")
            }))
            .route("/update_client.php", post(|s: Shared, h: HeaderMap, Json(b): Json<Value>| async move {
                accept(&s, &h, "update_client.php", b, "Client updated successfully")
            }))
            .route("/create_user.php", post(|s: Shared, h: HeaderMap, Json(b): Json<Value>| async move {
                accept(&s, &h, "create_user.php", b, "User created successfully")
            }))
            .route("/update_user.php", post(|s: Shared, h: HeaderMap, Json(b): Json<Value>| async move {
                accept(&s, &h, "update_user.php", b, "User updated successfully")
            }))
            .route("/delete_client.php", delete(|s: Shared, h: HeaderMap| async move {
                accept(&s, &h, "delete_client.php", Value::Null, "Client deleted successfully")
            }))
            .route("/delete_user.php", delete(|s: Shared, h: HeaderMap| async move {
                accept(&s, &h, "delete_user.php", Value::Null, "User deleted successfully")
            }))
            .layer(middleware::from_fn_with_state(state.clone(), fail_switch))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{}", addr), state }
    }

    /// Total number of requests the stub has received.
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn last_body(&self, endpoint: &str) -> Option<Value> {
        self.state.bodies.lock().unwrap().get(endpoint).cloned()
    }

    /// Makes every later request to `endpoint` answer a bare HTTP 500.
    pub fn fail(&self, endpoint: &str) {
        self.state.failing.lock().unwrap().insert(endpoint.to_string());
    }

    /// Adds a task record exactly as given, bypassing the seed shape.
    pub fn push_task(&self, task: Value) {
        self.state.tasks.lock().unwrap().push(task);
    }

    pub fn task(&self, id: i64) -> Option<Value> {
        self.state.tasks.lock().unwrap().iter().find(|t| t["id"] == json!(id)).cloned()
    }
}

fn seed_tasks() -> Vec<Value> {
    vec![
        json!({"id": 1, "clientId": 1, "clientName": "Acme Traders", "taskCategory": "GST Filing",
               "taskName": "GSTR-1 for March", "employeeId": 8, "employeeName": "Asha",
               "status": "pending", "approvalStatus": "pending", "priority": "high"}),
        json!({"id": 2, "clientId": 2, "clientName": "Blue Ocean", "taskCategory": "Audit",
               "taskName": "Stock audit", "employeeId": "7", "employeeName": "Ravi",
               "status": "in_progress", "approvalStatus": "rejected", "updatedTill": "2025-01"}),
        json!({"id": 3, "clientId": 1, "clientName": "Acme Traders", "taskCategory": "Income Tax",
               "taskName": "ITR filing", "employeeId": 7, "employeeName": "Ravi",
               "status": "completed", "approvalStatus": "pending", "deadline": "2025-03-31 18:00:00"}),
    ]
}

async fn fail_switch(State(state): Shared, req: Request, next: Next) -> Response {
    let endpoint = req.uri().path().trim_start_matches('/').to_string();
    let failing = state.failing.lock().unwrap().contains(&endpoint);
    if failing {
        state.calls.fetch_add(1, Ordering::SeqCst);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    next.run(req).await
}

fn envelope(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn ok(data: Value) -> Response {
    envelope(StatusCode::OK, json!({"success": true, "data": data}))
}

fn failure(message: &str) -> Response {
    envelope(StatusCode::OK, json!({"success": false, "message": message}))
}

/// Counts the request and rejects it unless it carries a known bearer token.
fn check(state: &StubState, headers: &HeaderMap) -> Result<(), Response> {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let auth = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    let json = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    match (auth, json) {
        (Some(a), Some("application/json"))
            if a == format!("Bearer {}", ADMIN_TOKEN) || a == format!("Bearer {}", EMPLOYEE_TOKEN) =>
        {
            Ok(())
        }
        _ => Err(envelope(StatusCode::UNAUTHORIZED, json!({"success": false, "message": "Unauthorized"}))),
    }
}

fn accept(state: &StubState, headers: &HeaderMap, endpoint: &str, body: Value, message: &str) -> Response {
    if let Err(denied) = check(state, headers) {
        return denied;
    }
    state.bodies.lock().unwrap().insert(endpoint.to_string(), body);
    envelope(StatusCode::OK, json!({"success": true, "message": message}))
}

async fn login(State(state): Shared, Json(body): Json<Value>) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let user = match (body["username"].as_str(), body["password"].as_str()) {
        (Some("admin@office.in"), Some("secret")) => admin_context(),
        (Some("ravi@office.in"), Some("secret")) => employee_context(),
        _ => return failure("Invalid username or password"),
    };
    envelope(StatusCode::OK, json!({"success": true, "token": user.token, "user": user.user}))
}

async fn tasks(State(state): Shared, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    let tasks = state.tasks.lock().unwrap().clone();
    let filtered: Vec<Value> = tasks
        .into_iter()
        .filter(|t| q.get("status").map_or(true, |s| t["status"] == json!(s)))
        .collect();
    ok(json!(filtered))
}

async fn employee_tasks(State(state): Shared, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    let emp = q.get("emp_id").cloned().unwrap_or_default();
    let tasks: Vec<Value> = state
        .tasks
        .lock()
        .unwrap()
        .iter()
        .filter(|t| t["employeeId"].to_string().trim_matches('"') == emp)
        .cloned()
        .collect();
    ok(json!(tasks))
}

async fn update_status(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    state.bodies.lock().unwrap().insert("update_status.php".into(), body.clone());
    let mut tasks = state.tasks.lock().unwrap();
    match tasks.iter_mut().find(|t| t["id"] == body["id"]) {
        Some(task) if task["approvalStatus"] == json!("approved") => failure("Task already approved"),
        Some(task) => {
            task["status"] = body["status"].clone();
            task["updatedTill"] = body["updated_till"].clone();
            task["employeeTaskComment"] = body["employee_task_comment"].clone();
            // resubmitted work goes back into review
            task["approvalStatus"] = json!("pending");
            envelope(StatusCode::OK, json!({"success": true, "message": "Status updated"}))
        }
        None => failure("Task not found"),
    }
}

async fn approve_task(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    state.bodies.lock().unwrap().insert("approve_task.php".into(), body.clone());
    let mut tasks = state.tasks.lock().unwrap();
    match tasks.iter_mut().find(|t| t["id"] == body["id"]) {
        Some(task) => {
            task["approvalStatus"] = body["approvalStatus"].clone();
            envelope(StatusCode::OK, json!({"success": true}))
        }
        None => failure("Task not found"),
    }
}

async fn delete_task(State(state): Shared, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    let id: i64 = q.get("id").and_then(|v| v.parse().ok()).unwrap_or_default();
    state.tasks.lock().unwrap().retain(|t| t["id"] != json!(id));
    envelope(StatusCode::OK, json!({"success": true, "message": "Task deleted successfully"}))
}

async fn client_report(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    ok(json!({
        "client": {"name": "Acme Traders", "code": "ACME01"},
        "generatedAt": "2025-02-10 09:15:00",
        "tasks": {"GST Filing": [seed_tasks()[0].clone()]}
    }))
}

async fn clients(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    ok(json!([
        {"id": "1", "name": "Acme Traders", "code": "ACME01"},
        {"id": 2, "name": "Blue Ocean", "code": "BLUE02"}
    ]))
}

async fn get_client(State(state): Shared, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    match q.get("id").map(String::as_str) {
        Some("1") => ok(json!({"id": 1, "name": "Acme Traders", "code": "ACME01"})),
        Some("500") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => failure("Client not found"),
    }
}

async fn create_client(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if body["code"] == json!("DUP") {
        state.calls.fetch_add(1, Ordering::SeqCst);
        return failure("Client code already exists");
    }
    accept(&state, &headers, "create_client.php", body, "Client created successfully")
}

async fn employees(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    ok(json!([{"id": 7, "name": "Ravi"}, {"id": 8, "name": "Asha"}]))
}

async fn users(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    ok(json!([admin_context().user, employee_context().user]))
}

async fn get_user(State(state): Shared, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if let Err(denied) = check(&state, &headers) {
        return denied;
    }
    match q.get("id").map(String::as_str) {
        Some("7") => ok(json!(employee_context().user)),
        Some("1") => ok(json!(admin_context().user)),
        _ => failure("User not found"),
    }
}

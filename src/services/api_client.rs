//! HTTP client for the remote task API.
//!
//! Every endpoint answers with an [`Envelope`]. Transport failures, non-2xx
//! statuses and `success: false` bodies all come back as [`ApiError`], so a
//! caller only ever sees data or a message to show.
use std::sync::Arc;
use reqwest::{header::CONTENT_TYPE, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    ApprovalStatus, Client, ClientReport, Employee, Envelope, Priority, Task, TaskStatus, User, Role,
};
use crate::services::session::SessionContext;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub client_id: i64,
    pub task_category: String,
    pub task_name: String,
    pub assigned_to: i64,
    pub deadline: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatusUpdateRequest {
    pub id: i64,
    pub status: TaskStatus,
    pub updated_till: String,
    pub employee_task_comment: String,
}

#[derive(Debug, Serialize)]
struct ApprovalRequest {
    id: i64,
    #[serde(rename = "approvalStatus")]
    approval_status: ApprovalStatus,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub username: String,
    // left out entirely to keep the stored password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn authed(&self, method: Method, endpoint: &str, ctx: &SessionContext) -> RequestBuilder {
        self.http
            .request(method, self.url(endpoint))
            .bearer_auth(&ctx.token)
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send<T: DeserializeOwned>(endpoint: &str, request: RequestBuilder) -> ApiResult<Envelope<T>> {
        tracing::debug!("Calling {}", endpoint);

        let response = request.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", endpoint, e);
            ApiError::Transport(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error bodies sometimes still carry an envelope with a message
            let message = serde_json::from_str::<Envelope<Value>>(&body).ok().and_then(|e| e.message);
            tracing::warn!("{} answered HTTP {}", endpoint, status.as_u16());
            return Err(match message {
                Some(message) => ApiError::Rejected(Some(message)),
                None => ApiError::Status(status.as_u16()),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Malformed response from {}: {}", endpoint, e);
            ApiError::Decode(e)
        })?;

        if !envelope.success {
            tracing::warn!(
                "{} rejected the request: {}",
                endpoint,
                envelope.message.as_deref().unwrap_or("no message")
            );
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Option<T>> {
        let request = self.authed(Method::GET, endpoint, ctx).query(query);
        Ok(Self::send::<T>(endpoint, request).await?.data)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Vec<T>> {
        Ok(self.fetch::<Vec<T>>(ctx, endpoint, query).await?.unwrap_or_default())
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.fetch::<T>(ctx, endpoint, query)
            .await?
            .ok_or_else(|| ApiError::Rejected(Some("No data returned".into())))
    }

    /// POST a JSON body; resolves to the API's success message, if any.
    async fn post<B: Serialize>(&self, ctx: &SessionContext, endpoint: &str, body: &B) -> ApiResult<Option<String>> {
        let request = self.authed(Method::POST, endpoint, ctx).json(body);
        Ok(Self::send::<Value>(endpoint, request).await?.message)
    }

    async fn delete(&self, ctx: &SessionContext, endpoint: &str, id: i64) -> ApiResult<Option<String>> {
        let request = self.authed(Method::DELETE, endpoint, ctx).query(&[("id", id)]);
        Ok(Self::send::<Value>(endpoint, request).await?.message)
    }

    // Auth

    /// Exchanges credentials for a bearer token and the user's profile.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<SessionContext> {
        let request = self
            .http
            .post(self.url("login.php"))
            .json(&LoginRequest { username, password });
        let envelope = Self::send::<Value>("login.php", request).await?;

        match (envelope.token, envelope.user) {
            (Some(token), Some(user)) if !token.is_empty() => Ok(SessionContext { token, user }),
            _ => Err(ApiError::Rejected(Some("Login failed".into()))),
        }
    }

    // Tasks

    pub async fn tasks(&self, ctx: &SessionContext, filters: &[(&str, String)]) -> ApiResult<Vec<Task>> {
        self.fetch_list(ctx, "tasks.php", filters).await
    }

    pub async fn create_task(&self, ctx: &SessionContext, task: &TaskRequest) -> ApiResult<Option<String>> {
        self.post(ctx, "create_task.php", task).await
    }

    pub async fn update_task(&self, ctx: &SessionContext, task: &TaskRequest) -> ApiResult<Option<String>> {
        self.post(ctx, "update_task.php", task).await
    }

    pub async fn update_status(&self, ctx: &SessionContext, update: &StatusUpdateRequest) -> ApiResult<Option<String>> {
        self.post(ctx, "update_status.php", update).await
    }

    pub async fn approve_task(
        &self,
        ctx: &SessionContext,
        id: i64,
        approval_status: ApprovalStatus,
    ) -> ApiResult<Option<String>> {
        self.post(ctx, "approve_task.php", &ApprovalRequest { id, approval_status }).await
    }

    pub async fn delete_task(&self, ctx: &SessionContext, id: i64) -> ApiResult<Option<String>> {
        self.delete(ctx, "delete_task.php", id).await
    }

    pub async fn client_report(&self, ctx: &SessionContext, client_id: i64) -> ApiResult<ClientReport> {
        self.fetch_one(ctx, "client_report.php", &[("clientId", client_id.to_string())]).await
    }

    // Clients

    pub async fn clients(&self, ctx: &SessionContext) -> ApiResult<Vec<Client>> {
        self.fetch_list(ctx, "clients.php", &[]).await
    }

    pub async fn client(&self, ctx: &SessionContext, id: i64) -> ApiResult<Client> {
        self.fetch_one(ctx, "get_client.php", &[("id", id.to_string())]).await
    }

    pub async fn create_client(&self, ctx: &SessionContext, client: &ClientRequest) -> ApiResult<Option<String>> {
        self.post(ctx, "create_client.php", client).await
    }

    pub async fn update_client(&self, ctx: &SessionContext, client: &ClientRequest) -> ApiResult<Option<String>> {
        self.post(ctx, "update_client.php", client).await
    }

    pub async fn delete_client(&self, ctx: &SessionContext, id: i64) -> ApiResult<Option<String>> {
        self.delete(ctx, "delete_client.php", id).await
    }

    // Employees

    pub async fn employees(&self, ctx: &SessionContext) -> ApiResult<Vec<Employee>> {
        self.fetch_list(ctx, "employees.php", &[]).await
    }

    pub async fn employee_tasks(&self, ctx: &SessionContext, employee_id: i64) -> ApiResult<Vec<Task>> {
        self.fetch_list(ctx, "get_employee_tasks.php", &[("emp_id", employee_id.to_string())]).await
    }

    // Users

    pub async fn users(&self, ctx: &SessionContext) -> ApiResult<Vec<User>> {
        self.fetch_list(ctx, "get_users.php", &[]).await
    }

    pub async fn user(&self, ctx: &SessionContext, id: i64) -> ApiResult<User> {
        self.fetch_one(ctx, "get_user.php", &[("id", id.to_string())]).await
    }

    pub async fn create_user(&self, ctx: &SessionContext, user: &UserRequest) -> ApiResult<Option<String>> {
        self.post(ctx, "create_user.php", user).await
    }

    pub async fn update_user(&self, ctx: &SessionContext, user: &UserRequest) -> ApiResult<Option<String>> {
        self.post(ctx, "update_user.php", user).await
    }

    pub async fn delete_user(&self, ctx: &SessionContext, id: i64) -> ApiResult<Option<String>> {
        self.delete(ctx, "delete_user.php", id).await
    }
}

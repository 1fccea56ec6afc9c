use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, MemoryStore, SessionManagerLayer};
use crate::{config::Config, handlers, middleware, services::ApiClient};

pub fn build_router(api: ApiClient, config: Config) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(config.session.cookie_name.clone());

    let body_limit = config.server.max_body_size;

    Router::new()
        // Auth routes
        .route("/", get(handlers::serve_login_page))
        .route("/login", post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))

        // Admin task routes
        .route("/admin", get(handlers::serve_admin_dashboard))
        .route("/admin/tasks/:task_id/delete", post(handlers::delete_task))
        .route(
            "/admin/tasks/:task_id/edit",
            get(handlers::serve_task_edit).post(handlers::handle_task_edit),
        )
        .route("/admin/assign", get(handlers::serve_assign_form).post(handlers::handle_assign))
        .route("/admin/assign/done", get(handlers::serve_assign_done))
        .route("/admin/approvals", get(handlers::serve_approvals))
        .route("/admin/approvals/:task_id", post(handlers::handle_approval))
        .route("/admin/reports", get(handlers::serve_reports))
        .route("/admin/reports/:client_id/download", get(handlers::download_report))

        // Client and user management
        .route("/admin/clients", get(handlers::serve_clients).post(handlers::create_client))
        .route("/admin/clients/new", get(handlers::serve_new_client))
        .route("/admin/clients/:client_id", post(handlers::update_client))
        .route("/admin/clients/:client_id/edit", get(handlers::serve_edit_client))
        .route("/admin/clients/:client_id/delete", post(handlers::delete_client))
        .route("/admin/users", get(handlers::serve_users).post(handlers::create_user))
        .route("/admin/users/new", get(handlers::serve_new_user))
        .route("/admin/users/:user_id", post(handlers::update_user))
        .route("/admin/users/:user_id/edit", get(handlers::serve_edit_user))
        .route("/admin/users/:user_id/delete", post(handlers::delete_user))

        // Employee routes
        .route("/employee", get(handlers::serve_employee_dashboard))
        .route("/employee/tasks/:task_id/edit", get(handlers::serve_status_form))
        .route("/employee/tasks/:task_id/status", post(handlers::handle_status_update))
        .route("/employee/profile", get(handlers::serve_profile).post(handlers::handle_profile))

        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)

        // Form posts only; no uploads
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state((api, config))
}

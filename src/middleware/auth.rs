use axum::{
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    extract::Request,
    body::Body,
};
use tower_sessions::Session;
use crate::services::session::SessionContext;

fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

/// Loads the session context once per request and hands it to handlers as an
/// extension. Anonymous requests go back to the login page; each role is kept
/// on its own dashboard.
pub async fn require_auth(
    session: Session,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if path == "/" || path == "/login" {
        return next.run(req).await;
    }

    let ctx = match SessionContext::load(&session).await {
        Ok(Some(ctx)) => ctx,
        Ok(None) => {
            tracing::debug!("No session for {}, redirecting to login", path);
            return Redirect::to("/").into_response();
        }
        Err(e) => return e.into_response(),
    };

    if under(&path, "/admin") && !ctx.is_admin() {
        tracing::warn!("User {} is not an admin, refusing {}", ctx.user.id, path);
        return Redirect::to("/employee").into_response();
    }
    if under(&path, "/employee") && ctx.is_admin() {
        return Redirect::to("/admin").into_response();
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

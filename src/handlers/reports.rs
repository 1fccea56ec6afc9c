use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response, Redirect},
    Extension,
};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::ReportQuery;
use crate::services::session::{Notice, SessionContext};
use crate::views::fragments;
use super::{templates, AppState};

pub async fn serve_reports(
    State((api, config)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let mut notice = Notice::take(&session).await?;

    let clients = match api.clients(&ctx).await {
        Ok(clients) => clients,
        Err(e) => {
            tracing::warn!("Failed to load clients: {}", e);
            notice = Some(Notice::error("Failed to load clients"));
            Vec::new()
        }
    };

    let selected = query.client_id.as_deref().map(str::trim);
    let mut report_html = String::new();

    // No client_id at all is the plain page; an empty one is a submitted form
    match selected {
        None => {}
        Some(raw) => match raw.parse::<i64>() {
            Err(_) => notice = Some(Notice::error("Please select a client")),
            Ok(client_id) => {
                tracing::info!("Generating report for client {}", client_id);
                match api.client_report(&ctx, client_id).await {
                    Ok(report) => {
                        tracing::debug!("Report has {} tasks", report.task_count());
                        report_html = fragments::report(&report, client_id);
                        notice = Some(Notice::success("Report generated successfully"));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to generate report for client {}: {}", client_id, e);
                        notice = Some(Notice::error(e.user_message("Failed to generate report")));
                    }
                }
            }
        },
    }

    let options: Vec<(String, String)> = clients
        .iter()
        .map(|c| (c.id.to_string(), format!("{} ({})", c.name, c.code)))
        .collect();

    let templates = templates(&config);
    let body = templates.render(
        "reports.html",
        &[
            ("client_options", fragments::select_options(&options, selected.unwrap_or("")).as_str()),
            ("report", report_html.as_str()),
        ],
    )?;
    Ok(templates.page("Client Reports", Some(&ctx), notice.as_ref(), &body)?.into_response())
}

/// The report as a plain-text attachment.
pub async fn download_report(
    State((api, _)): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    session: Session,
    Path(client_id): Path<i64>,
) -> AppResult<Response> {
    match api.client_report(&ctx, client_id).await {
        Ok(report) => {
            let file_name = report.file_name();
            tracing::info!("Downloading report {}", file_name);
            let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
            Ok((
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.to_text(),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to download report for client {}: {}", client_id, e);
            Notice::error(e.user_message("Failed to generate report")).flash(&session).await?;
            Ok(Redirect::to("/admin/reports").into_response())
        }
    }
}

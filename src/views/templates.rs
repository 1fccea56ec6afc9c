use std::path::PathBuf;
use axum::response::Html;
use crate::errors::{AppError, AppResult};
use crate::services::session::{Notice, SessionContext};
use super::fragments;

/// HTML templates on disk with `{{name}}` placeholders.
#[derive(Debug, Clone)]
pub struct Templates {
    dir: PathBuf,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> AppResult<String> {
        let path = self.dir.join(name);
        let template = std::fs::read_to_string(&path).map_err(|e| {
            tracing::error!("Failed to read template {}: {}", path.display(), e);
            AppError::Template(e)
        })?;
        Ok(fill(&template, vars))
    }

    /// Wraps `body` in the shared layout with header and pending notice.
    pub fn page(
        &self,
        title: &str,
        ctx: Option<&SessionContext>,
        notice: Option<&Notice>,
        body: &str,
    ) -> AppResult<Html<String>> {
        self.page_with_head(title, ctx, notice, "", body)
    }

    pub fn page_with_head(
        &self,
        title: &str,
        ctx: Option<&SessionContext>,
        notice: Option<&Notice>,
        head: &str,
        body: &str,
    ) -> AppResult<Html<String>> {
        let header = ctx.map(fragments::header).unwrap_or_default();
        let notice = notice.map(fragments::notice).unwrap_or_default();
        let html = self.render(
            "layout.html",
            &[
                ("title", escape(title).as_str()),
                ("head", head),
                ("header", header.as_str()),
                ("notice", notice.as_str()),
                ("body", body),
            ],
        )?;
        Ok(Html(html))
    }
}

/// Substitutes placeholders in one pass, so substituted text is never scanned
/// again. Unknown placeholders are left untouched.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

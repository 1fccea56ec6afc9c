use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::User;

const CONTEXT_KEY: &str = "session_context";
const NOTICE_KEY: &str = "notice";

/// Bearer token and user snapshot for the signed-in user. Created at login,
/// replaced after a profile update, destroyed at logout. Handlers receive it
/// explicitly and hand it to every API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    pub token: String,
    pub user: User,
}

impl SessionContext {
    pub async fn load(session: &Session) -> AppResult<Option<Self>> {
        Ok(session.get::<SessionContext>(CONTEXT_KEY).await?)
    }

    pub async fn store(&self, session: &Session) -> AppResult<()> {
        session.insert(CONTEXT_KEY, self).await?;
        Ok(())
    }

    pub async fn destroy(session: &Session) -> AppResult<()> {
        session.flush().await?;
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    /// Snapshot after the user changed their own name or username.
    pub fn with_profile(&self, name: &str, username: &str) -> Self {
        let mut next = self.clone();
        next.user.name = name.to_string();
        next.user.username = username.to_string();
        next
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message shown by the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }

    pub async fn flash(self, session: &Session) -> AppResult<()> {
        session.insert(NOTICE_KEY, self).await?;
        Ok(())
    }

    pub async fn take(session: &Session) -> AppResult<Option<Self>> {
        Ok(session.remove::<Notice>(NOTICE_KEY).await?)
    }
}

fn draft_key(form: &str) -> String {
    format!("draft:{}", form)
}

/// Keeps a rejected form's input so the next render can show it again.
pub async fn save_draft<T: Serialize>(session: &Session, form: &str, draft: &T) -> AppResult<()> {
    session.insert(&draft_key(form), draft).await?;
    Ok(())
}

pub async fn take_draft<T: DeserializeOwned>(session: &Session, form: &str) -> AppResult<Option<T>> {
    Ok(session.remove::<T>(&draft_key(form)).await?)
}

pub async fn clear_draft(session: &Session, form: &str) -> AppResult<()> {
    session.remove_value(&draft_key(form)).await?;
    Ok(())
}

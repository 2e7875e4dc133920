use tower_sessions::Session;

use crate::{AppResult, model::User, theme::Theme};

pub const USER: &str = "user";
pub const THEME: &str = "theme";
pub const CSRF_STATE: &str = "csrf_state";
pub const PKCE_VERIFIER: &str = "pkce_verifier";
pub const RETURN_URL: &str = "return_url";

pub async fn current_user(session: &Session) -> AppResult<Option<User>> {
    Ok(session.get::<User>(USER).await?)
}

pub async fn theme(session: &Session) -> AppResult<Theme> {
    Ok(session.get::<Theme>(THEME).await?.unwrap_or_default())
}

/// Only local paths are followed after sign-in or a theme switch.
pub fn safe_return_url(return_url: Option<String>) -> String {
    match return_url {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url,
        _ => "/".to_owned(),
    }
}

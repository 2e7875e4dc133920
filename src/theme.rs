use axum::{debug_handler, extract::Query, response::Redirect};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{AppResult, session};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn logo(self) -> &'static str {
        match self {
            Theme::Light => "/res/logo.svg",
            Theme::Dark => "/res/logo-dark.svg",
        }
    }

    /// Label of the control that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ToggleQuery {
    return_url: Option<String>,
}

#[debug_handler]
pub(crate) async fn toggle_theme(
    Query(ToggleQuery { return_url }): Query<ToggleQuery>,
    session: Session,
) -> AppResult<Redirect> {
    let theme = session::theme(&session).await?.toggle();
    session.insert(session::THEME, theme).await?;

    Ok(Redirect::to(&session::safe_return_url(return_url)))
}

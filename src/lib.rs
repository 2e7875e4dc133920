pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod hub;
pub mod index;
pub mod model;
pub mod res;
pub mod rooms;
pub mod session;
pub mod store;
pub mod theme;

use anyhow::anyhow;
use axum::{extract::FromRef, routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult, RoomError};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: store::SqliteStore,
    pub clients: auth::Clients,
}

pub trait GetField {
    fn get_str_field(&self, field: &str) -> anyhow::Result<String>;
}

impl GetField for serde_json::Value {
    fn get_str_field(&self, field: &str) -> anyhow::Result<String> {
        Ok(
            self.get(field)
            .ok_or_else(|| anyhow!("expected {field} in {self}"))?
            .as_str()
            .ok_or_else(|| anyhow!("expected {field} in {self} to be string"))?
            .to_owned()
        )
    }
}

pub fn app(app_state: AppState, session_minutes: i64) -> Router {
    serve(routes(), app_state, session_minutes)
}

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/theme", post(theme::toggle_theme))
        .route("/res/logo.svg", get(res::logo))
        .route("/res/logo-dark.svg", get(res::logo_dark))
        .route("/res/style.css", get(res::style))

        .merge(auth::router())
        .nest("/rooms", rooms::router())
}

pub(crate) fn serve(routes: Router<AppState>, app_state: AppState, session_minutes: i64) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(session_minutes)));

    routes
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

use anyhow::Context;
use letmeask::{app, auth, config::Config, db, hub::RoomHub, store::SqliteStore, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,letmeask=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    let db_pool = db::connect(&config.database_url)
        .await
        .context("failed to open database")?;

    let client_secrets = std::fs::read_to_string(&config.client_secrets)
        .with_context(|| format!("failed to read {}", config.client_secrets))?;
    let clients = auth::Clients::from_json(serde_json::from_str(&client_secrets)?, &config.public_url)?;

    let app_state = AppState {
        store: SqliteStore::new(db_pool, RoomHub::new()),
        clients,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", config.bind_addr);

    axum::serve(listener, app(app_state, config.session_minutes)).await?;
    Ok(())
}

use sqlx::{SqlitePool, migrate::Migrator, sqlite::SqlitePoolOptions};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(database_url)
        .await?;

    MIGRATOR.run(&db_pool).await?;
    tracing::info!("database ready at {database_url}");

    Ok(db_pool)
}

#[cfg(test)]
pub(crate) async fn memory() -> SqlitePool {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&db_pool).await.unwrap();
    db_pool
}

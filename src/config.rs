use std::{env, fmt::Display, str::FromStr};

use anyhow::Context;
use tracing::info;

pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub public_url: String,
    pub client_secrets: String,
    pub session_minutes: i64,
}

impl Config {
    /// Reads the environment, loading `.env` first if there is one.
    pub fn load() -> anyhow::Result<Self> {
        if dotenv::dotenv().is_ok() {
            info!("loaded .env");
        }

        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://letmeask.db?mode=rwc")?,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080")?,
            public_url: try_load::<String>("PUBLIC_URL", "http://localhost:8080")?
                .trim_end_matches('/')
                .to_owned(),
            client_secrets: try_load("CLIENT_SECRETS", "client_secret.json")?,
            session_minutes: try_load("SESSION_MINUTES", "60")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });

    value
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid {key} value {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_unset() {
        let minutes: i64 = try_load("LETMEASK_TEST_UNSET_MINUTES", "60").unwrap();
        assert_eq!(minutes, 60);
    }

    #[test]
    fn test_unparsable_default_is_an_error() {
        assert!(try_load::<i64>("LETMEASK_TEST_UNSET_NUMBER", "sixty").is_err());
    }
}

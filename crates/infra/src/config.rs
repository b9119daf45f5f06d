//! Database configuration from process environment.

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

/// PostgreSQL connection settings.
///
/// Read from `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`. The
/// fallback defaults are suitable only for local practice, never production.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let host = env_or("DB_HOST", "localhost");
        let port = env_or("DB_PORT", "5432").parse().unwrap_or_else(|_| {
            tracing::warn!("DB_PORT is not a valid port; falling back to 5432");
            5432
        });
        let user = env_or("DB_USER", "postgres");
        let password = env_or("DB_PASSWORD", "postgres");
        let database = env_or("DB_NAME", "libreria");

        Self {
            host,
            port,
            user,
            password,
            database,
            max_connections: 5,
        }
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    /// Open a connection pool against the configured database.
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        tracing::info!(
            host = %self.host,
            port = self.port,
            database = %self.database,
            "connecting to postgres"
        );

        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(self.connect_options())
            .await
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

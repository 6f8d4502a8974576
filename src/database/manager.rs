use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::repository::{PersonRepository, PgPersonRepository, SqlitePersonRepository};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Unsupported database scheme: {0}")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// True when the store itself is unreachable rather than a query failing
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DatabaseError::Sqlx(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }
}

/// Supported backing stores, keyed by URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

/// Opens the configured store and hands back its repository
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect to the configured database, create the `person` table if it
    /// is missing, and return the repository over it.
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn PersonRepository>, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let backend = Self::backend_for(url)?;
        info!("Connecting to {:?} store at {}", backend, Self::redacted(url));

        let repository: Arc<dyn PersonRepository> = match backend {
            Backend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(config.connection_timeout))
                    .connect(url)
                    .await?;
                let repository = PgPersonRepository::new(pool);
                repository.ensure_schema().await?;
                Arc::new(repository)
            }
            Backend::Sqlite => {
                let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
                let in_memory = url.contains(":memory:") || url.contains("mode=memory");

                // Every connection to an in-memory database is its own database,
                // so the pool must never hold more than one or recycle it.
                let pool_options = if in_memory {
                    SqlitePoolOptions::new()
                        .max_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None)
                } else {
                    SqlitePoolOptions::new().max_connections(config.max_connections)
                };

                let pool = pool_options
                    .acquire_timeout(Duration::from_secs(config.connection_timeout))
                    .connect_with(options)
                    .await?;
                let repository = SqlitePersonRepository::new(pool);
                repository.ensure_schema().await?;
                Arc::new(repository)
            }
        };

        info!("Database ready");
        Ok(repository)
    }

    /// Pick the backend from the URL scheme
    pub fn backend_for(url: &str) -> Result<Backend, DatabaseError> {
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match parsed.scheme() {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(DatabaseError::UnsupportedScheme(other.to_string())),
        }
    }

    /// URL with any password stripped, for logging
    fn redacted(url: &str) -> String {
        match url::Url::parse(url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("****"));
                }
                parsed.to_string()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}

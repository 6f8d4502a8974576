use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use person_api::auth::IdentityStore;
use person_api::config::{self, AppConfig};
use person_api::database::DatabaseManager;
use person_api::services::PersonService;
use person_api::{app, AppState};

#[derive(Parser)]
#[command(name = "person-api")]
#[command(about = "Person CRUD service with HTTP Basic role-based access control")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Port to listen on (overrides PERSON_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Database URL (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

impl Cli {
    /// Flags win over the environment
    fn apply(self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = Some(url);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = config::config().clone();
    cli.apply(&mut config);
    tracing::info!("Starting Person API in {:?} mode", config.environment);

    let repository = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;

    let cost = config.security.password_hash_cost;
    let identities = tokio::task::spawn_blocking(move || IdentityStore::with_default_identities(cost))
        .await?
        .context("failed to hash identity passwords")?;

    let state = AppState::new(PersonService::new(repository), identities);
    let router = app(state, &config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Person API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

use marketplace_server::{AppState, config::Config, create_router};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketplace_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    config.print_info();

    // WAL + busy timeout: writers queue on the lock instead of failing
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    info!("Database migrations applied");

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let state = Arc::new(AppState::new(
        pool,
        config.jwt_secret.clone(),
        config.upload_dir.clone(),
    ));
    let app = create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

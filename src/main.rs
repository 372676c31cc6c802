use anyhow::Context;
use chatpulse::{config::ChatConfig, db, router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,chatpulse=debug")),
        )
        .init();

    let config = ChatConfig::from_env();
    info!(?config, "loaded configuration");

    let db_pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .context("failed to open the message store")?;
    info!("store connected");

    let app = router(AppState::new(db_pool, &config));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("received Ctrl+C, shutting down");
        })
        .await?;

    Ok(())
}

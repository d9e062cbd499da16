use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use policydesk::api::server::start_server;
use policydesk::api::types::ApiContext;
use policydesk::blob::BlobStore;
use policydesk::config;
use policydesk::db::open_database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    std::fs::create_dir_all(config::database_dir())?;
    let db_path = config::database_dir().join("policydesk.db");
    // Opens and migrates up front so a broken schema fails fast.
    open_database(&db_path)?;
    let blobs = BlobStore::open(config::blobs_dir())?;

    let port = std::env::var("POLICYDESK_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config::DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let ctx = ApiContext::new(db_path, blobs);
    let mut server = start_server(ctx, addr).await?;
    tracing::info!(addr = %server.addr, "PolicyDesk ready");

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    Ok(())
}

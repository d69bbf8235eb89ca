use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemAssetStore;
use tracing::info;

use server::config::AppConfig;
use server::database::init_db;
use server::effects::{CredentialCountBadges, EffectDispatcher};
use server::seed::{ensure_indexes, seed_role_permissions};
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    seed_role_permissions(&db)
        .await
        .context("Failed to seed roles")?;
    ensure_indexes(&db).await?;
    info!("Database ready");

    let assets = FilesystemAssetStore::new(
        PathBuf::from(&config.storage.assets_dir),
        config.storage.public_base_url.clone(),
    )
    .await
    .context("Failed to prepare asset directory")?;

    let effects = EffectDispatcher::new(
        db.clone(),
        Arc::new(CredentialCountBadges),
        Arc::new(assets),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config,
        effects,
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

//! StoreGrid API server entry point

use anyhow::Context;
use storegrid_api::{routes, AppState, Config};
use storegrid_entitlement::{FeatureCatalog, TierCatalog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    // Catalog invariants are startup failures, not request-time surprises
    let features = FeatureCatalog::builtin();
    features
        .validate()
        .context("feature catalog failed validation")?;
    TierCatalog::builtin()
        .validate(&features)
        .context("tier catalog failed validation")?;

    let pool =
        storegrid_shared::create_pool(&config.database_url, config.database_max_connections)
            .await
            .context("failed to connect to database")?;

    if config.run_migrations {
        storegrid_shared::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config, pool);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    tracing::info!(address = %bind_address, "StoreGrid API listening");

    axum::serve(listener, app)
        .await
        .context("server exited with error")?;

    Ok(())
}

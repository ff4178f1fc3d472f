//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;
use storegrid_entitlement::{FeatureCatalog, TierCatalog, TierResolver};

use crate::config::Config;

/// Shared state for all request handlers. The catalogs are immutable and
/// built once at startup; every resolution reads the same snapshot.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub tiers: Arc<TierCatalog>,
    pub features: Arc<FeatureCatalog>,
    pub resolver: TierResolver,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let tiers = Arc::new(TierCatalog::builtin());
        let features = Arc::new(FeatureCatalog::builtin());
        let resolver = TierResolver::new(pool.clone(), tiers.clone());

        Self {
            config: Arc::new(config),
            pool,
            tiers,
            features,
            resolver,
        }
    }
}

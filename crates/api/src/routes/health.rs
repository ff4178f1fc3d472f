//! Health endpoints: liveness, readiness, and a summary that reports the
//! database plus the in-process catalogs the entitlement payloads are built
//! from

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use storegrid_entitlement::{FeatureCatalog, TierCatalog};

use crate::state::AppState;

/// Counts for the static catalogs loaded at startup. These never change at
/// runtime, so zeroes here mean the binary shipped without its data.
#[derive(Debug, Serialize)]
pub struct CatalogHealth {
    pub tiers: usize,
    pub features: usize,
    pub pillars: usize,
}

impl CatalogHealth {
    fn snapshot(tiers: &TierCatalog, features: &FeatureCatalog) -> Self {
        Self {
            tiers: tiers.tiers().len(),
            features: features.features().len(),
            pillars: features.pillars().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub catalogs: CatalogHealth,
}

/// Service health summary: database reachability plus catalog counts
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    let status_code = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if database_ok { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: if database_ok { "reachable" } else { "unreachable" }.to_string(),
            catalogs: CatalogHealth::snapshot(&state.tiers, &state.features),
        }),
    )
}

/// Liveness probe: 200 whenever the process is up
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the service serves entitlements only when the database
/// answers
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

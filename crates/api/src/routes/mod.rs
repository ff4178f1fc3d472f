//! HTTP route definitions

pub mod catalog;
pub mod health;
pub mod organizations;
pub mod tenants;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api/v1/tenants/:id", get(tenants::get_tenant))
        .route(
            "/api/v1/tenants/:id/entitlement",
            get(tenants::get_entitlement),
        )
        .route(
            "/api/v1/organizations/:id",
            get(organizations::get_organization),
        )
        .route("/api/v1/catalog/tiers", get(catalog::list_tiers))
        .route("/api/v1/catalog/features", get(catalog::list_features))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

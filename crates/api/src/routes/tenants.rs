//! Tenant routes: record lookup and the resolved entitlement payload the
//! dashboards render from

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use storegrid_entitlement::ResolvedTier;
use storegrid_shared::{Tenant, TenantId};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

// =============================================================================
// Response Types
// =============================================================================

/// Resolved entitlement plus the feature partition, grouped by pillar.
/// `available`/`locked` are pillar-group arrays; together they cover the
/// whole feature catalog exactly once.
#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    #[serde(flatten)]
    pub resolved: ResolvedTier,
    pub available: serde_json::Value,
    pub locked: serde_json::Value,
}

// =============================================================================
// Handlers
// =============================================================================

/// Get a tenant record by ID
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<Tenant>> {
    let tenant: Tenant = sqlx::query_as(
        r#"
        SELECT id, name, slug, subscription_tier, subscription_status,
               organization_id, created_at, updated_at
        FROM tenants
        WHERE id = $1
        "#,
    )
    .bind(tenant_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(tenant))
}

/// Resolve a tenant's effective tier and partition the feature catalog
/// against it
pub async fn get_entitlement(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<EntitlementResponse>> {
    let resolved = state.resolver.resolve(tenant_id).await?;

    // Partition by the effective grants, not the effective level: a tenant
    // on the no-benefit fallback tier has a level but holds no features,
    // and the payload must agree with `effective.features`
    let (available, locked) = resolved.partition(&state.features);

    let available = serde_json::to_value(state.features.by_pillar(&available))
        .map_err(|_| ApiError::Internal)?;
    let locked =
        serde_json::to_value(state.features.by_pillar(&locked)).map_err(|_| ApiError::Internal)?;

    Ok(Json(EntitlementResponse {
        resolved,
        available,
        locked,
    }))
}

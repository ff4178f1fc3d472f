//! Tier and feature catalog routes

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use storegrid_entitlement::{EntitlementError, TierDefinition};
use storegrid_shared::TierLevel;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct FeatureListQuery {
    /// Optional tier level token; when present the response is partitioned
    /// into available/locked at that level
    pub level: Option<String>,
}

/// List the tier catalog, both scopes
pub async fn list_tiers(State(state): State<AppState>) -> Json<Vec<TierDefinition>> {
    Json(state.tiers.tiers().to_vec())
}

/// List the feature catalog, optionally partitioned at a tier level
pub async fn list_features(
    State(state): State<AppState>,
    Query(query): Query<FeatureListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let body = match query.level {
        Some(token) => {
            let level: TierLevel = token
                .parse()
                .map_err(EntitlementError::InvalidTierLevel)?;

            let available = state.features.features_for_tier(level);
            let locked = state.features.locked_features(level);

            json!({
                "level": level,
                "available": serde_json::to_value(state.features.by_pillar(&available))
                    .map_err(|_| ApiError::Internal)?,
                "locked": serde_json::to_value(state.features.by_pillar(&locked))
                    .map_err(|_| ApiError::Internal)?,
            })
        }
        None => json!({
            "pillars": state.features.pillars(),
            "features": state.features.features(),
        }),
    };

    Ok(Json(body))
}

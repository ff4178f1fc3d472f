//! Organization (chain) routes

use axum::{
    extract::{Path, State},
    Json,
};
use storegrid_shared::{Organization, OrgId};

use crate::{error::ApiResult, state::AppState};

/// Get an organization record by ID
pub async fn get_organization(
    State(state): State<AppState>,
    Path(org_id): Path<OrgId>,
) -> ApiResult<Json<Organization>> {
    let org: Organization = sqlx::query_as(
        r#"
        SELECT id, name, slug, subscription_tier, created_at, updated_at
        FROM organizations
        WHERE id = $1
        "#,
    )
    .bind(org_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(org))
}

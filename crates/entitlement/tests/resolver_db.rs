//! Integration tests for database-backed tier resolution
//!
//! These tests verify the resolver's lookup behavior against a real
//! Postgres instance: tenant/organization loading, the all-or-nothing rule
//! for dangling organization references, and fallback on unknown tier ids.
//!
//! ## Running Tests
//! ```bash
//! export DATABASE_URL="postgres://..."
//! cargo test -p storegrid-entitlement --test resolver_db -- --ignored
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use sqlx::PgPool;
use storegrid_entitlement::{EntitlementError, TierCatalog, TierResolver};
use storegrid_shared::{OrgId, TenantId};

async fn setup() -> (TierResolver, PgPool) {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    storegrid_shared::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let resolver = TierResolver::new(pool.clone(), Arc::new(TierCatalog::builtin()));
    (resolver, pool)
}

async fn create_test_organization(pool: &PgPool, tier: &str) -> OrgId {
    let org_id = OrgId::new();
    sqlx::query(
        r#"
        INSERT INTO organizations (id, name, slug, subscription_tier)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(org_id)
    .bind("Test Chain")
    .bind(format!("test-chain-{}", org_id))
    .bind(tier)
    .execute(pool)
    .await
    .expect("Failed to create test organization");
    org_id
}

async fn create_test_tenant(pool: &PgPool, tier: &str, org_id: Option<OrgId>) -> TenantId {
    let tenant_id = TenantId::new();
    sqlx::query(
        r#"
        INSERT INTO tenants (id, name, slug, subscription_tier, subscription_status, organization_id)
        VALUES ($1, $2, $3, $4, 'active', $5)
        "#,
    )
    .bind(tenant_id)
    .bind("Test Store")
    .bind(format!("test-store-{}", tenant_id))
    .bind(tier)
    .bind(org_id)
    .execute(pool)
    .await
    .expect("Failed to create test tenant");
    tenant_id
}

#[tokio::test]
#[ignore] // Requires database
async fn test_resolve_solo_tenant() {
    let (resolver, pool) = setup().await;
    let tenant_id = create_test_tenant(&pool, "starter", None).await;

    let resolved = resolver.resolve(tenant_id).await.unwrap();

    assert!(!resolved.is_chain);
    assert!(resolved.organization.is_none());
    assert_eq!(resolved.tenant.unwrap().tier_id, "starter");
}

#[tokio::test]
#[ignore] // Requires database
async fn test_resolve_chain_tenant_merges_org_tier() {
    let (resolver, pool) = setup().await;
    let org_id = create_test_organization(&pool, "organization").await;
    let tenant_id = create_test_tenant(&pool, "starter", Some(org_id)).await;

    let resolved = resolver.resolve(tenant_id).await.unwrap();

    assert!(resolved.is_chain);
    assert!(resolved.effective.has_feature("chain_rollup_reports"));
}

#[tokio::test]
#[ignore] // Requires database
async fn test_resolve_unknown_tenant_errors() {
    let (resolver, _pool) = setup().await;

    let err = resolver.resolve(TenantId::new()).await.unwrap_err();
    assert!(matches!(err, EntitlementError::TenantNotFound(_)));
}

#[tokio::test]
#[ignore] // Requires database
async fn test_dangling_organization_fails_whole_resolution() {
    let (resolver, pool) = setup().await;
    let org_id = create_test_organization(&pool, "organization").await;
    let tenant_id = create_test_tenant(&pool, "starter", Some(org_id)).await;

    // organization_id is a plain back-reference, so deleting the chain row
    // leaves the member pointing at nothing
    sqlx::query("DELETE FROM organizations WHERE id = $1")
        .bind(org_id)
        .execute(&pool)
        .await
        .unwrap();

    // All-or-nothing: a half-loadable chain tenant must not resolve
    let err = resolver.resolve(tenant_id).await.unwrap_err();
    assert!(matches!(
        err,
        EntitlementError::OrganizationNotFound(id) if id == org_id
    ));
}

#[tokio::test]
#[ignore] // Requires database
async fn test_resolve_unknown_tier_id_degrades() {
    let (resolver, pool) = setup().await;
    let tenant_id = create_test_tenant(&pool, "legacy_v1", None).await;

    let resolved = resolver.resolve(tenant_id).await.unwrap();

    let snapshot = resolved.tenant.unwrap();
    assert!(!snapshot.recognized);
    assert!(resolved.effective.features.is_empty());
}

//! Tier Resolver
//!
//! Computes the effective entitlement for one tenant: the tenant's own tier
//! merged with its chain's tier, each granted feature tagged with where it
//! came from. This is THE function that answers "what can this tenant do?" —
//! dashboards consume the resolved value instead of re-deriving it.
//!
//! Resolution is all-or-nothing: if the tenant references an organization
//! that cannot be loaded, the whole resolution fails rather than returning a
//! tenant-only partial view. An unknown *tier id*, in contrast, degrades to
//! the no-benefit fallback tier (bad catalog data must never crash gating).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use storegrid_shared::{
    FeatureSource, Organization, OrgId, SubscriptionStatus, Tenant, TenantId, TierLevel, TierScope,
};

use crate::catalog::TierCatalog;
use crate::error::{EntitlementError, EntitlementResult};
use crate::features::{FeatureCatalog, FeatureDefinition};

/// One tier as resolved against the catalog for a single source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSnapshot {
    /// The tier id the record referenced (preserved even when unrecognized)
    pub tier_id: String,
    pub level: TierLevel,
    pub name: String,
    pub features: Vec<String>,
    /// False when the catalog had no such tier and the no-benefit fallback
    /// was applied
    pub recognized: bool,
}

/// A granted feature tagged with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGrant {
    pub id: String,
    pub source: FeatureSource,
}

/// The merged entitlement view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveTier {
    pub level: TierLevel,
    pub name: String,
    pub features: Vec<FeatureGrant>,
}

impl EffectiveTier {
    /// Check whether a specific feature is granted, from either source
    pub fn has_feature(&self, id: &str) -> bool {
        self.features.iter().any(|g| g.id == id)
    }
}

/// Billing standing derived from the tenant's subscription status. Shown as
/// a banner by the dashboards; does not alter the feature partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    Trialing,
    Active,
    PastDueGrace,
    Locked,
}

impl AccessState {
    pub fn from_status(status: SubscriptionStatus) -> Self {
        match status {
            SubscriptionStatus::Trial => Self::Trialing,
            SubscriptionStatus::Active => Self::Active,
            SubscriptionStatus::PastDue => Self::PastDueGrace,
            SubscriptionStatus::Canceled | SubscriptionStatus::Expired => Self::Locked,
        }
    }
}

impl std::fmt::Display for AccessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trialing => write!(f, "trialing"),
            Self::Active => write!(f, "active"),
            Self::PastDueGrace => write!(f, "past_due_grace"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

/// The computed, read-only entitlement view for one tenant.
/// Never persisted; recomputed per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTier {
    /// The tenant's own tier (None for organization-managed tenants that
    /// carry no individual plan)
    pub tenant: Option<TierSnapshot>,
    /// The chain's tier (None when the tenant has no organization)
    pub organization: Option<TierSnapshot>,
    pub effective: EffectiveTier,
    pub is_chain: bool,
    pub access: AccessState,
    pub computed_at: OffsetDateTime,
}

impl ResolvedTier {
    /// Partition the feature catalog by what is actually granted, not by the
    /// effective level token. The two agree for every recognized tier (the
    /// catalogs are validated against each other), but a no-benefit fallback
    /// carries the lowest level while granting nothing — partitioning on
    /// grants keeps "no benefits" meaning nothing shown unlocked.
    pub fn partition<'a>(
        &self,
        catalog: &'a FeatureCatalog,
    ) -> (Vec<&'a FeatureDefinition>, Vec<&'a FeatureDefinition>) {
        catalog
            .features()
            .iter()
            .partition(|f| self.effective.has_feature(&f.id))
    }
}

/// Resolve a tier id against the catalog, falling back to the no-benefit
/// tier when the id is unknown
fn resolve_snapshot(catalog: &TierCatalog, scope: TierScope, tier_id: &str) -> TierSnapshot {
    match catalog.get(scope, tier_id) {
        Some(def) => TierSnapshot {
            tier_id: def.id.clone(),
            level: def.level,
            name: def.display_name.clone(),
            features: def.features.clone(),
            recognized: true,
        },
        None => {
            tracing::warn!(tier_id, %scope, "unknown tier id, applying no-benefit fallback");
            let fallback = catalog.fallback(scope);
            TierSnapshot {
                tier_id: tier_id.to_string(),
                level: fallback.level,
                name: fallback.display_name,
                features: fallback.features,
                recognized: false,
            }
        }
    }
}

/// Pure function: compute the resolved tier from already-fetched records.
/// Deterministic — same inputs always produce the same entitlement view
/// (modulo `computed_at`).
pub fn resolve_from_records(
    catalog: &TierCatalog,
    tenant: &Tenant,
    organization: Option<&Organization>,
) -> ResolvedTier {
    let tenant_snapshot = if tenant.subscription_tier.is_empty() {
        // Organization-managed tenant with no individual plan of its own
        None
    } else {
        Some(resolve_snapshot(
            catalog,
            TierScope::Individual,
            &tenant.subscription_tier,
        ))
    };

    let org_snapshot = organization
        .map(|org| resolve_snapshot(catalog, TierScope::Organization, &org.subscription_tier));

    // Union of both feature sets. Tenant grants first so that when both
    // tiers grant the same feature the tenant tag wins; the capability is
    // identical either way, only the attribution differs.
    let mut features: Vec<FeatureGrant> = Vec::new();
    if let Some(t) = &tenant_snapshot {
        for id in &t.features {
            features.push(FeatureGrant {
                id: id.clone(),
                source: FeatureSource::Tenant,
            });
        }
    }
    if let Some(o) = &org_snapshot {
        for id in &o.features {
            if !features.iter().any(|g| &g.id == id) {
                features.push(FeatureGrant {
                    id: id.clone(),
                    source: FeatureSource::Organization,
                });
            }
        }
    }

    // Higher-ordinal level wins, so a tenant inside a high-tier chain is
    // never shown as locked out of chain-granted features
    let (level, name) = match (&tenant_snapshot, &org_snapshot) {
        (Some(t), Some(o)) => {
            if o.level.ordinal() > t.level.ordinal() {
                (o.level, o.name.clone())
            } else {
                (t.level, t.name.clone())
            }
        }
        (Some(t), None) => (t.level, t.name.clone()),
        (None, Some(o)) => (o.level, o.name.clone()),
        (None, None) => {
            let fallback = catalog.fallback(TierScope::Individual);
            (fallback.level, fallback.display_name)
        }
    };

    let is_chain = org_snapshot.is_some();

    ResolvedTier {
        tenant: tenant_snapshot,
        organization: org_snapshot,
        effective: EffectiveTier {
            level,
            name,
            features,
        },
        is_chain,
        access: AccessState::from_status(tenant.subscription_status),
        computed_at: OffsetDateTime::now_utc(),
    }
}

/// Entitlement resolution service
///
/// Loads the tenant (and its organization, if any) and delegates to the pure
/// merge. Holds only a pool and the shared catalog; resolutions for
/// different tenants are fully independent.
#[derive(Clone)]
pub struct TierResolver {
    pool: PgPool,
    catalog: Arc<TierCatalog>,
}

impl TierResolver {
    pub fn new(pool: PgPool, catalog: Arc<TierCatalog>) -> Self {
        Self { pool, catalog }
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    /// Compute the entitlement for a tenant
    pub async fn resolve(&self, tenant_id: TenantId) -> EntitlementResult<ResolvedTier> {
        let tenant = self
            .load_tenant(tenant_id)
            .await?
            .ok_or(EntitlementError::TenantNotFound(tenant_id))?;

        // All-or-nothing: a dangling organization reference fails the whole
        // resolution instead of silently producing a tenant-only view
        let organization = match tenant.organization_id {
            Some(org_id) => Some(
                self.load_organization(org_id)
                    .await?
                    .ok_or(EntitlementError::OrganizationNotFound(org_id))?,
            ),
            None => None,
        };

        Ok(resolve_from_records(
            &self.catalog,
            &tenant,
            organization.as_ref(),
        ))
    }

    async fn load_tenant(&self, tenant_id: TenantId) -> EntitlementResult<Option<Tenant>> {
        let tenant: Option<Tenant> = sqlx::query_as(
            r#"
            SELECT id, name, slug, subscription_tier, subscription_status,
                   organization_id, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    async fn load_organization(&self, org_id: OrgId) -> EntitlementResult<Option<Organization>> {
        let org: Option<Organization> = sqlx::query_as(
            r#"
            SELECT id, name, slug, subscription_tier, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(org)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(tier: &str, status: SubscriptionStatus, org_id: Option<OrgId>) -> Tenant {
        let now = OffsetDateTime::now_utc();
        Tenant {
            id: TenantId::new(),
            name: "Corner Books".to_string(),
            slug: "corner-books".to_string(),
            subscription_tier: tier.to_string(),
            subscription_status: status,
            organization_id: org_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn organization(tier: &str) -> Organization {
        let now = OffsetDateTime::now_utc();
        Organization {
            id: OrgId::new(),
            name: "Books & Co".to_string(),
            slug: "books-and-co".to_string(),
            subscription_tier: tier.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_solo_tenant_gets_exactly_its_own_features() {
        let catalog = TierCatalog::builtin();
        let t = tenant("starter", SubscriptionStatus::Active, None);

        let resolved = resolve_from_records(&catalog, &t, None);

        assert!(!resolved.is_chain);
        assert!(resolved.organization.is_none());
        let snapshot = resolved.tenant.unwrap();
        assert!(snapshot.recognized);

        let granted: Vec<&str> = resolved
            .effective
            .features
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        let own: Vec<&str> = snapshot.features.iter().map(String::as_str).collect();
        assert_eq!(granted, own);
        assert!(resolved
            .effective
            .features
            .iter()
            .all(|g| g.source == FeatureSource::Tenant));
        assert_eq!(resolved.effective.level, TierLevel::Starter);
    }

    #[test]
    fn test_chain_tenant_gets_union_with_tenant_tag_precedence() {
        let catalog = TierCatalog::builtin();
        let org = organization("organization");
        let t = tenant("starter", SubscriptionStatus::Active, Some(org.id));

        let resolved = resolve_from_records(&catalog, &t, Some(&org));

        assert!(resolved.is_chain);
        assert_eq!(resolved.effective.level, TierLevel::ChainCustom);
        assert_eq!(resolved.effective.name, "Organization");

        // No duplicate feature ids
        let mut ids: Vec<&str> = resolved
            .effective
            .features
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);

        // Union covers every org-granted feature
        let org_features = &resolved.organization.as_ref().unwrap().features;
        for id in org_features {
            assert!(resolved.effective.has_feature(id));
        }

        // Features granted by both carry the tenant tag; org-only features
        // carry the organization tag
        for grant in &resolved.effective.features {
            let tenant_grants_it = resolved
                .tenant
                .as_ref()
                .unwrap()
                .features
                .contains(&grant.id);
            if tenant_grants_it {
                assert_eq!(grant.source, FeatureSource::Tenant, "{}", grant.id);
            } else {
                assert_eq!(grant.source, FeatureSource::Organization, "{}", grant.id);
            }
        }
        assert_eq!(
            resolved
                .effective
                .features
                .iter()
                .find(|g| g.id == "chain_rollup_reports")
                .unwrap()
                .source,
            FeatureSource::Organization
        );
    }

    #[test]
    fn test_unknown_tier_id_falls_back_without_panicking() {
        let catalog = TierCatalog::builtin();
        let t = tenant("legacy_v1", SubscriptionStatus::Active, None);

        let resolved = resolve_from_records(&catalog, &t, None);

        let snapshot = resolved.tenant.unwrap();
        assert!(!snapshot.recognized);
        assert_eq!(snapshot.tier_id, "legacy_v1");
        assert!(snapshot.features.is_empty());
        assert!(resolved.effective.features.is_empty());
        assert_eq!(resolved.effective.level, TierLevel::Trial);
    }

    #[test]
    fn test_unknown_org_tier_falls_back_but_keeps_tenant_grants() {
        let catalog = TierCatalog::builtin();
        let org = organization("custom_2019");
        let t = tenant("professional", SubscriptionStatus::Active, Some(org.id));

        let resolved = resolve_from_records(&catalog, &t, Some(&org));

        assert!(resolved.is_chain);
        assert!(!resolved.organization.as_ref().unwrap().recognized);
        // Tenant's own tier still wins the level and supplies the features
        assert_eq!(resolved.effective.level, TierLevel::Professional);
        assert!(resolved.effective.has_feature("advanced_analytics"));
    }

    #[test]
    fn test_organization_managed_tenant_without_individual_plan() {
        let catalog = TierCatalog::builtin();
        let org = organization("organization");
        let t = tenant("", SubscriptionStatus::Active, Some(org.id));

        let resolved = resolve_from_records(&catalog, &t, Some(&org));

        assert!(resolved.tenant.is_none());
        assert!(resolved.is_chain);
        assert_eq!(resolved.effective.level, TierLevel::ChainCustom);
        assert!(resolved
            .effective
            .features
            .iter()
            .all(|g| g.source == FeatureSource::Organization));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let catalog = TierCatalog::builtin();
        let org = organization("organization");
        let t = tenant("starter", SubscriptionStatus::Active, Some(org.id));

        let a = resolve_from_records(&catalog, &t, Some(&org));
        let b = resolve_from_records(&catalog, &t, Some(&org));

        // Structurally identical apart from the computation timestamp
        assert_eq!(a.tenant, b.tenant);
        assert_eq!(a.organization, b.organization);
        assert_eq!(a.effective, b.effective);
        assert_eq!(a.is_chain, b.is_chain);
        assert_eq!(a.access, b.access);
    }

    #[test]
    fn test_access_state_from_status() {
        assert_eq!(
            AccessState::from_status(SubscriptionStatus::Trial),
            AccessState::Trialing
        );
        assert_eq!(
            AccessState::from_status(SubscriptionStatus::Active),
            AccessState::Active
        );
        assert_eq!(
            AccessState::from_status(SubscriptionStatus::PastDue),
            AccessState::PastDueGrace
        );
        assert_eq!(
            AccessState::from_status(SubscriptionStatus::Canceled),
            AccessState::Locked
        );
        assert_eq!(
            AccessState::from_status(SubscriptionStatus::Expired),
            AccessState::Locked
        );
    }

    #[test]
    fn test_access_state_display() {
        assert_eq!(AccessState::Active.to_string(), "active");
        assert_eq!(AccessState::PastDueGrace.to_string(), "past_due_grace");
        assert_eq!(AccessState::Locked.to_string(), "locked");
    }

    #[test]
    fn test_partition_agrees_with_level_gate_for_recognized_tiers() {
        let tiers = TierCatalog::builtin();
        let features = FeatureCatalog::builtin();
        let t = tenant("professional", SubscriptionStatus::Active, None);

        let resolved = resolve_from_records(&tiers, &t, None);
        let (available, locked) = resolved.partition(&features);

        let by_level = features.features_for_tier(resolved.effective.level);
        let available_ids: Vec<&str> = available.iter().map(|f| f.id.as_str()).collect();
        let level_ids: Vec<&str> = by_level.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(available_ids, level_ids);
        assert_eq!(available.len() + locked.len(), features.features().len());
    }

    #[test]
    fn test_partition_on_fallback_tier_unlocks_nothing() {
        // A tenant on an unrecognized tier id gets the no-benefit fallback,
        // whose level token is the lowest ordinal. The payload partition
        // must follow the (empty) grants, not the level, or the response
        // would show trial features unlocked while effective is empty.
        let tiers = TierCatalog::builtin();
        let features = FeatureCatalog::builtin();
        let t = tenant("legacy_v1", SubscriptionStatus::Active, None);

        let resolved = resolve_from_records(&tiers, &t, None);
        assert!(resolved.effective.features.is_empty());

        let (available, locked) = resolved.partition(&features);
        assert!(available.is_empty());
        assert_eq!(locked.len(), features.features().len());
    }

    #[test]
    fn test_past_due_does_not_shrink_the_feature_partition() {
        let catalog = TierCatalog::builtin();
        let active = tenant("professional", SubscriptionStatus::Active, None);
        let past_due = tenant("professional", SubscriptionStatus::PastDue, None);

        let a = resolve_from_records(&catalog, &active, None);
        let b = resolve_from_records(&catalog, &past_due, None);

        assert_eq!(a.effective, b.effective);
        assert_eq!(b.access, AccessState::PastDueGrace);
    }
}

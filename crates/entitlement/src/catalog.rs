//! Tier Catalog
//!
//! Static definitions of the subscription tiers sold on the platform, in two
//! families: individual tiers (one tenant) and organization tiers (a whole
//! chain). Tier ids are unique within their scope.

use serde::{Deserialize, Serialize};
use storegrid_shared::{StoreError, TierLevel, TierScope};

use crate::features::FeatureCatalog;

/// A named subscription level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    pub id: String,
    pub display_name: String,
    pub description: String,
    /// Monthly price in cents
    pub price_cents: i64,
    /// None = unlimited
    pub max_skus: Option<u32>,
    /// None = unlimited
    pub max_locations: Option<u32>,
    /// Feature ids granted at this level
    pub features: Vec<String>,
    pub scope: TierScope,
    pub level: TierLevel,
}

/// The full static tier catalog, both scopes
#[derive(Debug, Clone)]
pub struct TierCatalog {
    tiers: Vec<TierDefinition>,
}

fn tier(
    id: &str,
    display_name: &str,
    description: &str,
    price_cents: i64,
    max_skus: Option<u32>,
    max_locations: Option<u32>,
    features: &[&str],
    scope: TierScope,
    level: TierLevel,
) -> TierDefinition {
    TierDefinition {
        id: id.to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        price_cents,
        max_skus,
        max_locations,
        features: features.iter().map(|f| f.to_string()).collect(),
        scope,
        level,
    }
}

impl TierCatalog {
    /// The built-in catalog
    /// Individual family: trial ($0) -> starter ($29) -> professional ($79)
    /// -> enterprise ($199). Organization family: organization (custom).
    pub fn builtin() -> Self {
        let tiers = vec![
            tier(
                "trial",
                "Trial",
                "Try StoreGrid free with a limited catalog",
                0,
                Some(50),
                Some(1),
                &["sku_catalog", "online_storefront", "sales_dashboard"],
                TierScope::Individual,
                TierLevel::Trial,
            ),
            tier(
                "starter",
                "Starter",
                "Everything a single shop needs to sell online",
                2_900,
                Some(1_000),
                Some(1),
                &[
                    "sku_catalog",
                    "online_storefront",
                    "sales_dashboard",
                    "low_stock_alerts",
                    "bulk_import",
                    "custom_domain",
                    "directory_listing",
                ],
                TierScope::Individual,
                TierLevel::Starter,
            ),
            tier(
                "professional",
                "Professional",
                "Multi-location inventory, marketing, and analytics",
                7_900,
                Some(25_000),
                Some(5),
                &[
                    "sku_catalog",
                    "online_storefront",
                    "sales_dashboard",
                    "low_stock_alerts",
                    "bulk_import",
                    "custom_domain",
                    "directory_listing",
                    "multi_location_stock",
                    "priority_placement",
                    "email_campaigns",
                    "loyalty_program",
                    "advanced_analytics",
                ],
                TierScope::Individual,
                TierLevel::Professional,
            ),
            tier(
                "enterprise",
                "Enterprise",
                "Unlimited catalog with business profile sync",
                19_900,
                None,
                None,
                &[
                    "sku_catalog",
                    "online_storefront",
                    "sales_dashboard",
                    "low_stock_alerts",
                    "bulk_import",
                    "custom_domain",
                    "directory_listing",
                    "multi_location_stock",
                    "priority_placement",
                    "email_campaigns",
                    "loyalty_program",
                    "advanced_analytics",
                    "gbp_category_sync",
                ],
                TierScope::Individual,
                TierLevel::Enterprise,
            ),
            tier(
                "organization",
                "Organization",
                "Chain-wide plan covering every member location",
                0, // Custom pricing, invoiced per contract
                None,
                None,
                &[
                    "sku_catalog",
                    "online_storefront",
                    "sales_dashboard",
                    "low_stock_alerts",
                    "bulk_import",
                    "custom_domain",
                    "directory_listing",
                    "multi_location_stock",
                    "priority_placement",
                    "email_campaigns",
                    "loyalty_program",
                    "advanced_analytics",
                    "gbp_category_sync",
                    "chain_rollup_reports",
                ],
                TierScope::Organization,
                TierLevel::ChainCustom,
            ),
        ];

        Self { tiers }
    }

    /// All tiers, individual family first
    pub fn tiers(&self) -> &[TierDefinition] {
        &self.tiers
    }

    /// Look up a tier by scope and id. Returns None for unknown ids; callers
    /// that must not fail use `fallback()` instead of erroring.
    pub fn get(&self, scope: TierScope, id: &str) -> Option<&TierDefinition> {
        self.tiers.iter().find(|t| t.scope == scope && t.id == id)
    }

    /// The no-benefit tier applied when a tenant/organization references a
    /// tier id the catalog does not know: empty feature set, zero limits.
    pub fn fallback(&self, scope: TierScope) -> TierDefinition {
        TierDefinition {
            id: "none".to_string(),
            display_name: "No Plan".to_string(),
            description: "Referenced tier was not found in the catalog".to_string(),
            price_cents: 0,
            max_skus: Some(0),
            max_locations: Some(0),
            features: Vec::new(),
            scope,
            level: TierLevel::Trial,
        }
    }

    /// Validate catalog invariants: ids unique within scope, and every
    /// granted feature id exists in the feature catalog
    pub fn validate(&self, features: &FeatureCatalog) -> Result<(), StoreError> {
        for (i, t) in self.tiers.iter().enumerate() {
            if self.tiers[..i]
                .iter()
                .any(|other| other.scope == t.scope && other.id == t.id)
            {
                return Err(StoreError::Validation(format!(
                    "duplicate tier id {} in scope {}",
                    t.id, t.scope
                )));
            }
            for fid in &t.features {
                if features.get(fid).is_none() {
                    return Err(StoreError::Validation(format!(
                        "tier {} grants unknown feature {}",
                        t.id, fid
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

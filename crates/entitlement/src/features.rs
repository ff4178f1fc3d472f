//! Feature Catalog & Gate
//!
//! Static catalog of every feature the platform ships, keyed by the minimum
//! tier level that unlocks it, plus the partition/grouping logic the
//! dashboards consume.
//!
//! The core correctness property of the gate: for any level, the available
//! and locked sets partition the catalog exactly (no overlap, nothing
//! dropped).

use serde::{Deserialize, Serialize};
use storegrid_shared::{StoreError, TierLevel};

/// A display grouping for features ("pillar"), with an explicit ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarDefinition {
    pub key: String,
    pub name: String,
    pub order: u8,
}

/// One catalog entry. Static, not per-tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub id: String,
    pub name: String,
    pub tagline: String,
    pub icon: String,
    pub route: Option<String>,
    pub pillar: String,
    pub required_tier: TierLevel,
}

/// Features for one pillar, in catalog insertion order
#[derive(Debug, Clone, Serialize)]
pub struct PillarGroup<'a> {
    pub pillar: &'a PillarDefinition,
    pub features: Vec<&'a FeatureDefinition>,
}

/// The full static feature catalog
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    pillars: Vec<PillarDefinition>,
    features: Vec<FeatureDefinition>,
}

fn pillar(key: &str, name: &str, order: u8) -> PillarDefinition {
    PillarDefinition {
        key: key.to_string(),
        name: name.to_string(),
        order,
    }
}

fn feature(
    id: &str,
    name: &str,
    tagline: &str,
    icon: &str,
    route: Option<&str>,
    pillar: &str,
    required_tier: TierLevel,
) -> FeatureDefinition {
    FeatureDefinition {
        id: id.to_string(),
        name: name.to_string(),
        tagline: tagline.to_string(),
        icon: icon.to_string(),
        route: route.map(str::to_string),
        pillar: pillar.to_string(),
        required_tier,
    }
}

impl FeatureCatalog {
    /// The built-in catalog shipped with the platform
    pub fn builtin() -> Self {
        let pillars = vec![
            pillar("inventory", "Inventory", 1),
            pillar("storefront", "Storefront", 2),
            pillar("marketing", "Marketing", 3),
            pillar("insights", "Insights", 4),
        ];

        let features = vec![
            // Inventory
            feature(
                "sku_catalog",
                "SKU Catalog",
                "Track every product you sell in one place",
                "boxes",
                Some("/inventory"),
                "inventory",
                TierLevel::Trial,
            ),
            feature(
                "low_stock_alerts",
                "Low Stock Alerts",
                "Get notified before shelves go empty",
                "bell",
                Some("/inventory/alerts"),
                "inventory",
                TierLevel::Starter,
            ),
            feature(
                "bulk_import",
                "Bulk Import",
                "Load your whole catalog from CSV in minutes",
                "upload",
                Some("/inventory/import"),
                "inventory",
                TierLevel::Starter,
            ),
            feature(
                "multi_location_stock",
                "Multi-Location Stock",
                "One inventory view across every location",
                "map-pin",
                Some("/inventory/locations"),
                "inventory",
                TierLevel::Professional,
            ),
            // Storefront
            feature(
                "online_storefront",
                "Online Storefront",
                "A hosted store page for your shop",
                "store",
                Some("/storefront"),
                "storefront",
                TierLevel::Trial,
            ),
            feature(
                "custom_domain",
                "Custom Domain",
                "Serve your storefront from your own domain",
                "globe",
                Some("/storefront/domain"),
                "storefront",
                TierLevel::Starter,
            ),
            feature(
                "directory_listing",
                "Directory Listing",
                "Appear in the public store directory",
                "list",
                None,
                "storefront",
                TierLevel::Starter,
            ),
            feature(
                "priority_placement",
                "Priority Placement",
                "Rank higher in directory search results",
                "trending-up",
                None,
                "storefront",
                TierLevel::Professional,
            ),
            // Marketing
            feature(
                "email_campaigns",
                "Email Campaigns",
                "Reach your customers with targeted email",
                "mail",
                Some("/marketing/email"),
                "marketing",
                TierLevel::Professional,
            ),
            feature(
                "loyalty_program",
                "Loyalty Program",
                "Reward repeat customers automatically",
                "award",
                Some("/marketing/loyalty"),
                "marketing",
                TierLevel::Professional,
            ),
            feature(
                "gbp_category_sync",
                "Business Profile Sync",
                "Keep Google Business Profile categories in sync",
                "refresh-cw",
                Some("/marketing/gbp"),
                "marketing",
                TierLevel::Enterprise,
            ),
            // Insights
            feature(
                "sales_dashboard",
                "Sales Dashboard",
                "Daily sales at a glance",
                "bar-chart",
                Some("/insights"),
                "insights",
                TierLevel::Trial,
            ),
            feature(
                "advanced_analytics",
                "Advanced Analytics",
                "Cohorts, margins, and sell-through reports",
                "line-chart",
                Some("/insights/advanced"),
                "insights",
                TierLevel::Professional,
            ),
            feature(
                "chain_rollup_reports",
                "Chain Rollup Reports",
                "Aggregate reporting across all chain locations",
                "layers",
                Some("/insights/chain"),
                "insights",
                TierLevel::ChainCustom,
            ),
        ];

        Self { pillars, features }
    }

    /// All features, in catalog insertion order
    pub fn features(&self) -> &[FeatureDefinition] {
        &self.features
    }

    /// All pillars
    pub fn pillars(&self) -> &[PillarDefinition] {
        &self.pillars
    }

    /// Look up a single feature by id
    pub fn get(&self, id: &str) -> Option<&FeatureDefinition> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Every feature available at the given level (required ordinal <= level ordinal)
    pub fn features_for_tier(&self, level: TierLevel) -> Vec<&FeatureDefinition> {
        self.features
            .iter()
            .filter(|f| level.satisfies(f.required_tier))
            .collect()
    }

    /// The exact complement: every feature NOT available at the given level
    pub fn locked_features(&self, level: TierLevel) -> Vec<&FeatureDefinition> {
        self.features
            .iter()
            .filter(|f| !level.satisfies(f.required_tier))
            .collect()
    }

    /// Group a feature list by pillar, pillars ordered by their `order` field,
    /// features in the order they were passed in. Empty pillars are skipped.
    pub fn by_pillar<'a>(&'a self, features: &[&'a FeatureDefinition]) -> Vec<PillarGroup<'a>> {
        let mut pillars: Vec<&PillarDefinition> = self.pillars.iter().collect();
        pillars.sort_by_key(|p| p.order);

        pillars
            .into_iter()
            .filter_map(|p| {
                let members: Vec<&FeatureDefinition> = features
                    .iter()
                    .copied()
                    .filter(|f| f.pillar == p.key)
                    .collect();
                if members.is_empty() {
                    None
                } else {
                    Some(PillarGroup {
                        pillar: p,
                        features: members,
                    })
                }
            })
            .collect()
    }

    /// Validate catalog internal consistency: unique pillar keys, unique
    /// feature ids, and every feature attached to a known pillar
    pub fn validate(&self) -> Result<(), StoreError> {
        for (i, p) in self.pillars.iter().enumerate() {
            if self.pillars[..i].iter().any(|other| other.key == p.key) {
                return Err(StoreError::Validation(format!(
                    "duplicate pillar key: {}",
                    p.key
                )));
            }
        }
        for (i, f) in self.features.iter().enumerate() {
            if self.features[..i].iter().any(|other| other.id == f.id) {
                return Err(StoreError::Validation(format!(
                    "duplicate feature id: {}",
                    f.id
                )));
            }
            if !self.pillars.iter().any(|p| p.key == f.pillar) {
                return Err(StoreError::Validation(format!(
                    "feature {} references unknown pillar {}",
                    f.id, f.pillar
                )));
            }
        }
        Ok(())
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

//! Common types used across StoreGrid

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// ID Wrappers
// =============================================================================

/// Tenant ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Organization (chain) ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OrgId(pub Uuid);

impl OrgId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrgId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrgId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Subscription tier level, ordered by capability.
///
/// Tier identifiers ("starter", "professional", ...) are catalog keys; the
/// level is the ordinal axis every gate comparison runs on. `ChainCustom` is
/// reserved for organization-scoped tiers so chain-granted features are never
/// shown as locked on a member tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TierLevel {
    Trial,
    Starter,
    Professional,
    Enterprise,
    ChainCustom,
}

impl Default for TierLevel {
    fn default() -> Self {
        Self::Trial
    }
}

impl TierLevel {
    /// Ordinal rank for this level (higher = more capable)
    /// Trial: 0, Starter: 1, Professional: 2, Enterprise: 3, ChainCustom: 4
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Trial => 0,
            Self::Starter => 1,
            Self::Professional => 2,
            Self::Enterprise => 3,
            Self::ChainCustom => 4,
        }
    }

    /// True if this level grants everything `required` demands
    pub fn satisfies(&self, required: TierLevel) -> bool {
        self.ordinal() >= required.ordinal()
    }

    /// The higher-ordinal of two levels (merge rule for chain tenants)
    pub fn max(self, other: TierLevel) -> TierLevel {
        if other.ordinal() > self.ordinal() {
            other
        } else {
            self
        }
    }

    /// All levels in ascending ordinal order
    pub fn all() -> [TierLevel; 5] {
        [
            Self::Trial,
            Self::Starter,
            Self::Professional,
            Self::Enterprise,
            Self::ChainCustom,
        ]
    }
}

impl std::fmt::Display for TierLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trial => write!(f, "trial"),
            Self::Starter => write!(f, "starter"),
            Self::Professional => write!(f, "professional"),
            Self::Enterprise => write!(f, "enterprise"),
            Self::ChainCustom => write!(f, "chain_custom"),
        }
    }
}

impl std::str::FromStr for TierLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trial" => Ok(Self::Trial),
            "starter" => Ok(Self::Starter),
            "professional" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            "chain_custom" => Ok(Self::ChainCustom),
            _ => Err(format!("Invalid tier level: {}", s)),
        }
    }
}

/// Scope of a tier definition
/// Individual tiers apply to a single tenant; organization tiers apply to
/// every tenant in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierScope {
    Individual,
    Organization,
}

impl std::fmt::Display for TierScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Individual => write!(f, "individual"),
            Self::Organization => write!(f, "organization"),
        }
    }
}

/// Subscription status for a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Canceled,
    Expired,
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        Self::Trial
    }
}

impl SubscriptionStatus {
    /// Whether the subscription is in good standing (trial counts)
    pub fn in_good_standing(&self) -> bool {
        matches!(self, Self::Trial | Self::Active)
    }

    /// Whether the subscription has ended (no grace period remains)
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Canceled | Self::Expired)
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trial => write!(f, "trial"),
            Self::Active => write!(f, "active"),
            Self::PastDue => write!(f, "past_due"),
            Self::Canceled => write!(f, "canceled"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trial" => Ok(Self::Trial),
            "active" => Ok(Self::Active),
            "past_due" => Ok(Self::PastDue),
            "canceled" => Ok(Self::Canceled),
            "expired" => Ok(Self::Expired),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

/// Which tier granted a feature to a tenant
/// When both tiers grant the same feature, the tenant tag wins (the more
/// specific grant), so dashboards attribute it to the tenant's own plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSource {
    Tenant,
    Organization,
}

impl std::fmt::Display for FeatureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tenant => write!(f, "tenant"),
            Self::Organization => write!(f, "organization"),
        }
    }
}

// =============================================================================
// Database Models
// =============================================================================

/// Tenant (single retail location/account) model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub slug: String,
    /// Individual-scope tier id (catalog key, not a level token)
    pub subscription_tier: String,
    pub subscription_status: SubscriptionStatus,
    /// Back-reference to the owning chain, if any
    pub organization_id: Option<OrgId>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Organization (chain) model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub slug: String,
    /// Organization-scope tier id (catalog key)
    pub subscription_tier: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Tests
// =============================================================================

//! StoreGrid Entitlement
//!
//! Tier catalog, feature gate, and the tier resolver that computes the
//! effective entitlement for a tenant (own tier merged with any chain tier).

pub mod catalog;
pub mod error;
pub mod features;
pub mod resolver;

pub use catalog::{TierCatalog, TierDefinition};
pub use error::{EntitlementError, EntitlementResult};
pub use features::{FeatureCatalog, FeatureDefinition, PillarDefinition, PillarGroup};
pub use resolver::{
    resolve_from_records, AccessState, EffectiveTier, FeatureGrant, ResolvedTier, TierResolver,
    TierSnapshot,
};

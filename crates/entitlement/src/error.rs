//! Entitlement error types

use storegrid_shared::{OrgId, TenantId};
use thiserror::Error;

/// Entitlement-specific errors
///
/// An unknown tier id is deliberately NOT an error: the resolver degrades to
/// the no-benefit fallback tier so a bad catalog key never takes down a
/// dashboard. Lookup failures, in contrast, abort the whole resolution so a
/// caller can never render entitlements built from half the data.
#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrgId),

    #[error("Invalid tier level: {0}")]
    InvalidTierLevel(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for EntitlementError {
    fn from(err: sqlx::Error) -> Self {
        EntitlementError::Database(err.to_string())
    }
}

pub type EntitlementResult<T> = Result<T, EntitlementError>;

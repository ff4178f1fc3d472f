//! Error types for StoreGrid

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entitlement error: {0}")]
    Entitlement(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

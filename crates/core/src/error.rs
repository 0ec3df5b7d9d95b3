//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic inventory outcomes (validation, missing items,
/// short stock). Oracle and store failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. zero quantity, blank item name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. blank user id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The requested item concept is not in the inventory.
    #[error("item not found: {item}")]
    NotFound { item: String },

    /// A removal asked for more than the inventory holds.
    #[error("insufficient quantity of {key}: held {held}, requested {requested}")]
    InsufficientQuantity {
        key: String,
        held: u64,
        requested: u64,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(item: impl Into<String>) -> Self {
        Self::NotFound { item: item.into() }
    }

    pub fn insufficient(key: impl Into<String>, held: u64, requested: u64) -> Self {
        Self::InsufficientQuantity {
            key: key.into(),
            held,
            requested,
        }
    }
}

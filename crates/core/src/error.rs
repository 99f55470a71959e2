//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Kind of entity a command referred to by id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Product,
    Category,
    Supplier,
}

impl core::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ReferenceKind::Product => "product",
            ReferenceKind::Category => "category",
            ReferenceKind::Supplier => "supplier",
        })
    }
}

/// Domain-level error.
///
/// Every variant blocks the command that produced it: a rejected command never yields
/// a new snapshot. Infrastructure concerns (storage, remote services) belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed command input (missing field, out-of-range number, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The capability check denied the acting user.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The command references an id that does not exist in the snapshot.
    #[error("unknown {kind}: {id}")]
    UnknownReference { kind: ReferenceKind, id: String },

    /// An outbound movement would drive stock below zero under the reject policy.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(reason.into())
    }

    pub fn unknown(kind: ReferenceKind, id: impl core::fmt::Display) -> Self {
        Self::UnknownReference {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

//! `nexus-core`: shared building blocks for the stock ledger.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::Aggregate;
pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult, ReferenceKind};
pub use id::{AuditLogId, CategoryId, ProductId, SupplierId, TransactionId, UserId};

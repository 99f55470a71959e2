//! Inventory ledger & consistency engine.
//!
//! This crate keeps product stock levels, the movement ledger and the audit trail
//! mutually consistent. It is implemented purely as deterministic domain logic
//! (no IO, no storage); every command yields a new [`Snapshot`] version.

pub mod audit;
pub mod catalog;
pub mod ledger;
pub mod policy;
pub mod product;
pub mod snapshot;
pub mod transaction;

pub use audit::{AuditAction, AuditLog, AuditTrail, DEFAULT_AUDIT_CAPACITY};
pub use catalog::{Category, Supplier, SupplierDraft};
pub use ledger::{
    CreateCategory, CreateProduct, DeleteProduct, ExportReport, LedgerCommand, LedgerContext,
    LedgerEvent, OnboardSupplier, RecordMovement, ReportKind, UpdateProduct,
};
pub use policy::{LedgerPolicy, NegativeStockPolicy};
pub use product::{Product, ProductDraft, ProductPatch};
pub use snapshot::{Applied, DELETED_ASSET_LABEL, Movement, Snapshot, Transition};
pub use transaction::{MovementType, Transaction, fold_quantity};

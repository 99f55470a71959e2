//! `nexus-ai`
//!
//! **Responsibility:** the optional inventory insight request.
//!
//! This crate is intentionally **not** part of the ledger:
//! - It does not depend on the inventory crate; callers hand it an [`InsightContext`].
//! - It never mutates ledger state.
//! - It produces human-readable insight reports, not ledger events.

pub mod context;
pub mod error;
pub mod heuristic;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod service;

pub use context::{ContextRow, InsightContext, ItemSignals};
pub use error::InsightError;
pub use heuristic::HeuristicInsightProvider;
pub use prompt::build_prompt;
pub use provider::InsightProvider;
pub use report::{Finding, FindingKind, InsightReport};
pub use service::InsightService;

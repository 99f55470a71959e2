//! Read-only inputs for an insight request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One product as sent to a remote summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRow {
    pub name: String,
    pub sku: String,
    pub stock: i64,
    pub reorder_level: u32,
    pub expiry: Option<NaiveDate>,
    pub price: f64,
}

/// A context row plus the local signals the heuristic provider uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSignals {
    pub row: ContextRow,
    /// Supplier name, if the product's supplier still exists.
    pub supplier: Option<String>,
    pub inbound_units: i64,
    pub outbound_units: i64,
}

impl ItemSignals {
    pub fn new(row: ContextRow) -> Self {
        Self {
            row,
            supplier: None,
            inbound_units: 0,
            outbound_units: 0,
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_movements(mut self, inbound_units: i64, outbound_units: i64) -> Self {
        self.inbound_units = inbound_units;
        self.outbound_units = outbound_units;
        self
    }
}

/// Everything an insight provider may look at. Built from a cloned snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightContext {
    pub items: Vec<ItemSignals>,
    pub generated_at: DateTime<Utc>,
}

impl InsightContext {
    pub fn new(items: Vec<ItemSignals>, generated_at: DateTime<Utc>) -> Self {
        Self { items, generated_at }
    }

    pub fn rows(&self) -> Vec<&ContextRow> {
        self.items.iter().map(|i| &i.row).collect()
    }
}

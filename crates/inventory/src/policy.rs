use serde::{Deserialize, Serialize};

use nexus_core::DomainError;

use crate::audit::DEFAULT_AUDIT_CAPACITY;

/// What an OUTBOUND movement may do to stock that would go below zero.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeStockPolicy {
    /// Reject the movement with `InsufficientStock`.
    #[default]
    Reject,
    /// Accept it; negative quantity means units are owed (backorder).
    Backorder,
}

impl core::str::FromStr for NegativeStockPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(NegativeStockPolicy::Reject),
            "backorder" | "allow" => Ok(NegativeStockPolicy::Backorder),
            other => Err(DomainError::validation(format!(
                "unknown negative stock policy '{other}' (expected 'reject' or 'backorder')"
            ))),
        }
    }
}

/// Switches that change how the ledger decides commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPolicy {
    pub negative_stock: NegativeStockPolicy,
    /// Reject a product whose SKU (case-insensitive) is already used by another product.
    pub unique_sku: bool,
    pub audit_capacity: usize,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            negative_stock: NegativeStockPolicy::Reject,
            unique_sku: true,
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }
}

impl LedgerPolicy {
    pub fn with_negative_stock(mut self, policy: NegativeStockPolicy) -> Self {
        self.negative_stock = policy;
        self
    }

    pub fn with_unique_sku(mut self, unique_sku: bool) -> Self {
        self.unique_sku = unique_sku;
        self
    }

    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = capacity;
        self
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    StockoutRisk,
    SlowMover,
    BatchOrder,
}

/// One actionable bullet of an insight report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// SKU for item findings, supplier name for batch orders.
    pub subject: String,
    pub explanation: String,
}

/// Result of an insight request.
///
/// This is display material only; it never feeds back into the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    /// Summary text with one bullet per finding.
    pub summary: String,
    pub findings: Vec<Finding>,
    /// Free-form metadata (provider name, thresholds).
    pub metadata: JsonValue,
}

impl InsightReport {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            findings: Vec::new(),
            metadata: JsonValue::Null,
        }
    }

    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn findings_of(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

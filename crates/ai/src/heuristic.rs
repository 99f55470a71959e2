//! Local, deterministic insight provider.
//!
//! Rules:
//! - **Stockout risk**: stock at or below the reorder level, or expiring within
//!   `expiry_window_days` of the request.
//! - **Slow mover**: comfortably stocked but with no outbound movement on record.
//! - **Batch order**: stockout risks grouped by supplier, each topped back up to twice its
//!   reorder level.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::json;

use crate::context::{InsightContext, ItemSignals};
use crate::error::InsightError;
use crate::provider::InsightProvider;
use crate::report::{Finding, FindingKind, InsightReport};

const UNASSIGNED_SUPPLIER: &str = "Unassigned supplier";

#[derive(Debug, Clone)]
pub struct HeuristicInsightProvider {
    expiry_window_days: i64,
}

impl Default for HeuristicInsightProvider {
    fn default() -> Self {
        Self {
            expiry_window_days: 30,
        }
    }
}

impl HeuristicInsightProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expiry_window_days(mut self, days: i64) -> Self {
        self.expiry_window_days = days;
        self
    }

    fn stockout_reason(&self, item: &ItemSignals, context: &InsightContext) -> Option<String> {
        let row = &item.row;
        if row.stock <= 0 {
            return Some(format!("{} ({}) is out of stock", row.name, row.sku));
        }
        if row.stock <= i64::from(row.reorder_level) {
            return Some(format!(
                "{} ({}) has {} units left, at or below its reorder level of {}",
                row.name, row.sku, row.stock, row.reorder_level
            ));
        }
        let today = context.generated_at.date_naive();
        row.expiry.and_then(|expiry| {
            let days_left = (expiry - today).num_days();
            (days_left <= self.expiry_window_days).then(|| {
                if days_left < 0 {
                    format!("{} ({}) expired on {expiry}", row.name, row.sku)
                } else {
                    format!("{} ({}) expires in {days_left} day(s) on {expiry}", row.name, row.sku)
                }
            })
        })
    }

    /// Pure rule evaluation; exposed for callers that do not run an async runtime.
    pub fn analyze(&self, context: &InsightContext) -> InsightReport {
        let mut findings = Vec::new();
        let mut orders: BTreeMap<String, Vec<(String, i64)>> = BTreeMap::new();

        for item in &context.items {
            let row = &item.row;
            if let Some(reason) = self.stockout_reason(item, context) {
                findings.push(Finding {
                    kind: FindingKind::StockoutRisk,
                    subject: row.sku.clone(),
                    explanation: reason,
                });

                let target = i64::from(row.reorder_level) * 2;
                let quantity = (target - row.stock).max(1);
                let supplier = item
                    .supplier
                    .clone()
                    .unwrap_or_else(|| UNASSIGNED_SUPPLIER.to_string());
                orders.entry(supplier).or_default().push((row.sku.clone(), quantity));
            } else if item.outbound_units == 0 {
                findings.push(Finding {
                    kind: FindingKind::SlowMover,
                    subject: row.sku.clone(),
                    explanation: format!(
                        "{} ({}) holds {} units with no outbound movement on record",
                        row.name, row.sku, row.stock
                    ),
                });
            }
        }

        for (supplier, lines) in &orders {
            let list = lines
                .iter()
                .map(|(sku, qty)| format!("{qty} x {sku}"))
                .collect::<Vec<_>>()
                .join(", ");
            findings.push(Finding {
                kind: FindingKind::BatchOrder,
                subject: supplier.clone(),
                explanation: format!("Place one order with {supplier}: {list}"),
            });
        }

        let summary = if findings.is_empty() {
            "Inventory looks healthy: no stockout risks, slow movers or pending batch orders.".to_string()
        } else {
            findings
                .iter()
                .map(|f| format!("- {}", f.explanation))
                .collect::<Vec<_>>()
                .join("\n")
        };

        InsightReport::new(summary)
            .with_findings(findings)
            .with_metadata(json!({
                "provider": self.name(),
                "expiry_window_days": self.expiry_window_days,
                "items": context.items.len(),
            }))
    }
}

#[async_trait]
impl InsightProvider for HeuristicInsightProvider {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn generate(&self, context: &InsightContext) -> Result<InsightReport, InsightError> {
        Ok(self.analyze(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextRow;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn item(sku: &str, stock: i64, reorder_level: u32, outbound: i64) -> ItemSignals {
        ItemSignals::new(ContextRow {
            name: format!("Item {sku}"),
            sku: sku.to_string(),
            stock,
            reorder_level,
            expiry: None,
            price: 1.0,
        })
        .with_movements(0, outbound)
    }

    fn context(items: Vec<ItemSignals>) -> InsightContext {
        InsightContext::new(items, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    }

    fn subjects(report: &InsightReport, kind: FindingKind) -> Vec<String> {
        report.findings_of(kind).map(|f| f.subject.clone()).collect()
    }

    #[test]
    fn flags_items_at_or_below_reorder_level() {
        let report = HeuristicInsightProvider::new().analyze(&context(vec![
            item("LOW", 5, 5, 3),
            item("OK", 6, 5, 3),
            item("OUT", 0, 0, 3),
        ]));
        assert_eq!(subjects(&report, FindingKind::StockoutRisk), vec!["LOW", "OUT"]);
    }

    #[test]
    fn flags_items_close_to_expiry() {
        let mut milk = item("MLK-001", 100, 50, 10);
        milk.row.expiry = NaiveDate::from_ymd_opt(2024, 3, 25);
        let mut far = item("FAR", 100, 50, 10);
        far.row.expiry = NaiveDate::from_ymd_opt(2025, 1, 1);

        let report = HeuristicInsightProvider::new().analyze(&context(vec![milk, far]));
        assert_eq!(subjects(&report, FindingKind::StockoutRisk), vec!["MLK-001"]);
        assert!(report.summary.contains("expires in 24 day(s)"));
    }

    #[test]
    fn expiry_window_is_configurable() {
        let mut milk = item("MLK-001", 100, 50, 10);
        milk.row.expiry = NaiveDate::from_ymd_opt(2024, 3, 25);

        let narrow = HeuristicInsightProvider::new().with_expiry_window_days(7);
        let report = narrow.analyze(&context(vec![milk]));
        assert!(subjects(&report, FindingKind::StockoutRisk).is_empty());
        assert_eq!(report.metadata["expiry_window_days"], 7);
    }

    #[test]
    fn items_without_outbound_movement_are_slow_movers() {
        let report = HeuristicInsightProvider::new().analyze(&context(vec![
            item("IDLE", 40, 5, 0),
            item("BUSY", 40, 5, 12),
        ]));
        assert_eq!(subjects(&report, FindingKind::SlowMover), vec!["IDLE"]);
    }

    #[test]
    fn batch_orders_are_grouped_by_supplier() {
        let report = HeuristicInsightProvider::new().analyze(&context(vec![
            item("A", 1, 5, 1).with_supplier("Office Depot"),
            item("B", 2, 10, 1).with_supplier("Office Depot"),
            item("C", 0, 3, 1).with_supplier("Global Tech Inc"),
            item("D", 0, 3, 1),
        ]));

        let orders: Vec<&Finding> = report.findings_of(FindingKind::BatchOrder).collect();
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].subject, "Global Tech Inc");
        assert_eq!(orders[1].subject, "Office Depot");
        assert_eq!(orders[1].explanation, "Place one order with Office Depot: 9 x A, 18 x B");
        assert_eq!(orders[2].subject, UNASSIGNED_SUPPLIER);
    }

    #[test]
    fn healthy_inventory_has_no_findings() {
        let report = HeuristicInsightProvider::new().analyze(&context(vec![item("OK", 50, 5, 7)]));
        assert!(report.findings.is_empty());
        assert!(report.summary.starts_with("Inventory looks healthy"));
    }

    #[tokio::test]
    async fn provider_trait_delegates_to_rules() {
        let provider = HeuristicInsightProvider::new();
        let report = provider.generate(&context(vec![item("LOW", 1, 5, 1)])).await.unwrap();
        assert_eq!(report.metadata["provider"], "heuristic");
        assert_eq!(subjects(&report, FindingKind::StockoutRisk), vec!["LOW"]);
    }
}

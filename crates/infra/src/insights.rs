//! Builds the insight request context from a snapshot.

use chrono::{DateTime, Utc};

use nexus_ai::{ContextRow, InsightContext, ItemSignals};
use nexus_inventory::{MovementType, Snapshot};

/// One row per product, with supplier names and per-product movement volumes resolved.
pub fn insight_context(snapshot: &Snapshot, now: DateTime<Utc>) -> InsightContext {
    let items = snapshot
        .products()
        .iter()
        .map(|p| {
            let (inbound, outbound) = snapshot
                .transactions()
                .iter()
                .filter(|t| t.product_id == p.id)
                .fold((0i64, 0i64), |(inbound, outbound), t| match t.movement {
                    MovementType::Inbound => (inbound + t.quantity, outbound),
                    MovementType::Outbound => (inbound, outbound + t.quantity),
                    MovementType::Adjustment => (inbound, outbound),
                });

            let signals = ItemSignals::new(ContextRow {
                name: p.name.clone(),
                sku: p.sku.clone(),
                stock: p.quantity,
                reorder_level: p.reorder_level,
                expiry: p.expiry_date,
                price: p.price,
            })
            .with_movements(inbound, outbound);

            match snapshot.supplier(&p.supplier_id) {
                Some(supplier) => signals.with_supplier(supplier.name.clone()),
                None => signals,
            }
        })
        .collect();

    InsightContext::new(items, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_ai::{FindingKind, HeuristicInsightProvider};

    #[test]
    fn seeded_context_resolves_suppliers_and_volumes() {
        let context = insight_context(&Snapshot::seeded(Utc::now()), Utc::now());
        assert_eq!(context.items.len(), 3);

        let pen = context.items.iter().find(|i| i.row.sku == "PEN-022").unwrap();
        assert_eq!(pen.supplier.as_deref(), Some("Office Depot"));
        assert_eq!(pen.outbound_units, 20);

        let laptop = context.items.iter().find(|i| i.row.sku == "LAP-001").unwrap();
        assert_eq!(laptop.inbound_units, 5);
        assert_eq!(laptop.outbound_units, 0);
    }

    #[test]
    fn heuristic_report_over_seed_data() {
        let context = insight_context(&Snapshot::seeded(Utc::now()), Utc::now());
        let report = HeuristicInsightProvider::new().analyze(&context);

        let risks: Vec<&str> = report
            .findings_of(FindingKind::StockoutRisk)
            .map(|f| f.subject.as_str())
            .collect();
        assert_eq!(risks, vec!["PEN-022", "MLK-001"]);

        let slow: Vec<&str> = report
            .findings_of(FindingKind::SlowMover)
            .map(|f| f.subject.as_str())
            .collect();
        assert_eq!(slow, vec!["LAP-001"]);
    }
}

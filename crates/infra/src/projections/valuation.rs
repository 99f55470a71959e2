use nexus_inventory::Snapshot;

/// Dashboard headline figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationSummary {
    pub total_value: f64,
    pub total_units: i64,
    pub product_count: usize,
    pub low_stock_count: usize,
}

/// Σ price × quantity over all products.
pub fn total_inventory_value(snapshot: &Snapshot) -> f64 {
    snapshot.products().iter().map(|p| p.stock_value()).sum()
}

/// Σ quantity over all products. Backordered (negative) stock reduces the total.
pub fn total_units(snapshot: &Snapshot) -> i64 {
    snapshot.products().iter().map(|p| p.quantity).sum()
}

pub fn valuation_summary(snapshot: &Snapshot) -> ValuationSummary {
    ValuationSummary {
        total_value: total_inventory_value(snapshot),
        total_units: total_units(snapshot),
        product_count: snapshot.products().len(),
        low_stock_count: snapshot.products().iter().filter(|p| p.is_low_stock()).count(),
    }
}

use nexus_inventory::{Product, Snapshot};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    /// At or below the reorder level but not exactly zero (includes backorders).
    Low,
    OutOfStock,
}

pub fn status_of(product: &Product) -> StockStatus {
    if product.is_out_of_stock() {
        StockStatus::OutOfStock
    } else if product.is_low_stock() {
        StockStatus::Low
    } else {
        StockStatus::InStock
    }
}

/// Products with `quantity <= reorder_level`, in catalog order.
pub fn low_stock(snapshot: &Snapshot) -> Vec<&Product> {
    snapshot.products().iter().filter(|p| p.is_low_stock()).collect()
}

/// Products with exactly zero units. Always a subset of [`low_stock`].
pub fn out_of_stock(snapshot: &Snapshot) -> Vec<&Product> {
    snapshot.products().iter().filter(|p| p.is_out_of_stock()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::fixtures::{product, snapshot};
    use proptest::prelude::*;

    #[test]
    fn reorder_boundary_is_inclusive() {
        let s = snapshot(
            vec![
                product("eq", "c1", 1.0, 5, 5),
                product("above", "c1", 1.0, 6, 5),
                product("zero", "c1", 1.0, 0, 5),
            ],
            vec![],
        );

        let low: Vec<&str> = low_stock(&s).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(low, vec!["eq", "zero"]);

        let out: Vec<&str> = out_of_stock(&s).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(out, vec!["zero"]);
    }

    proptest! {
        #[test]
        fn out_of_stock_is_subset_of_low_stock(
            levels in proptest::collection::vec((-20i64..40, 0u32..20), 0..30),
        ) {
            let products = levels
                .iter()
                .enumerate()
                .map(|(i, (qty, reorder))| product(&format!("p{i}"), "c1", 1.0, *qty, *reorder))
                .collect();
            let s = snapshot(products, vec![]);
            let low = low_stock(&s);
            for p in out_of_stock(&s) {
                prop_assert!(low.contains(&p));
            }
        }
    }

    #[test]
    fn status_classifies_each_band() {
        assert_eq!(status_of(&product("a", "c1", 1.0, 0, 5)), StockStatus::OutOfStock);
        assert_eq!(status_of(&product("a", "c1", 1.0, -1, 5)), StockStatus::Low);
        assert_eq!(status_of(&product("a", "c1", 1.0, 5, 5)), StockStatus::Low);
        assert_eq!(status_of(&product("a", "c1", 1.0, 6, 5)), StockStatus::InStock);
    }
}

//! Search filters used by the inventory and movement lists.

use nexus_core::CategoryId;
use nexus_inventory::{Product, Snapshot, Transaction};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Products whose name or SKU contains `term` (case-insensitive), optionally restricted
/// to one category. An empty term matches everything.
pub fn search_products<'a>(
    snapshot: &'a Snapshot,
    term: &str,
    category: Option<&CategoryId>,
) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    snapshot
        .products()
        .iter()
        .filter(|p| category.is_none_or(|c| &p.category_id == c))
        .filter(|p| contains_ignore_case(&p.name, &needle) || contains_ignore_case(&p.sku, &needle))
        .collect()
}

/// Movements whose product name, product SKU or note contains `term`, newest first.
///
/// Entries of deleted products can still match on their note.
pub fn search_transactions<'a>(snapshot: &'a Snapshot, term: &str) -> Vec<&'a Transaction> {
    let needle = term.trim().to_lowercase();
    let mut matches: Vec<&Transaction> = snapshot
        .transactions()
        .iter()
        .filter(|t| {
            let by_product = snapshot.product(&t.product_id).is_some_and(|p| {
                contains_ignore_case(&p.name, &needle) || contains_ignore_case(&p.sku, &needle)
            });
            by_product || contains_ignore_case(&t.note, &needle)
        })
        .collect();
    matches.sort_by(|a, b| b.date.cmp(&a.date));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::fixtures::{at, product, snapshot, tx};
    use nexus_inventory::MovementType;

    fn ids<T: AsRef<str>>(items: impl IntoIterator<Item = T>) -> Vec<String> {
        items.into_iter().map(|s| s.as_ref().to_string()).collect()
    }

    #[test]
    fn product_search_matches_name_or_sku_case_insensitively() {
        let s = snapshot(
            vec![product("lap", "c1", 1.0, 1, 0), product("pen", "c2", 1.0, 1, 0)],
            vec![],
        );

        let hits = search_products(&s, "sku-LAP", None);
        assert_eq!(ids(hits.iter().map(|p| p.id.as_str())), vec!["lap"]);

        let all = search_products(&s, "", None);
        assert_eq!(all.len(), 2);

        let c2 = CategoryId::from("c2");
        let filtered = search_products(&s, "product", Some(&c2));
        assert_eq!(ids(filtered.iter().map(|p| p.id.as_str())), vec!["pen"]);
    }

    #[test]
    fn transaction_search_covers_notes_and_sorts_newest_first() {
        let s = snapshot(
            vec![product("p1", "c1", 1.0, 1, 0)],
            vec![
                tx("t1", "p1", MovementType::Inbound, 1, at(1, 0)),
                tx("t2", "gone", MovementType::Outbound, 1, at(4, 0)),
                tx("t3", "p1", MovementType::Outbound, 1, at(2, 0)),
            ],
        );

        let by_name = search_transactions(&s, "product p1");
        assert_eq!(ids(by_name.iter().map(|t| t.id.as_str())), vec!["t3", "t1"]);

        let by_note = search_transactions(&s, "NOTE T2");
        assert_eq!(ids(by_note.iter().map(|t| t.id.as_str())), vec!["t2"]);

        assert_eq!(search_transactions(&s, "").len(), 3);
    }
}

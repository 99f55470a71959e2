use serde::Serialize;

use nexus_core::CategoryId;
use nexus_inventory::Snapshot;

/// One slice of the category distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category_id: CategoryId,
    pub name: String,
    /// Number of products (not units) in the category.
    pub count: usize,
}

/// Product count per category, in category order. Empty categories are included with a
/// zero count; products pointing at unknown categories are not counted.
pub fn category_distribution(snapshot: &Snapshot) -> Vec<CategoryCount> {
    snapshot
        .categories()
        .iter()
        .map(|category| CategoryCount {
            category_id: category.id.clone(),
            name: category.name.clone(),
            count: snapshot
                .products()
                .iter()
                .filter(|p| p.category_id == category.id)
                .count(),
        })
        .collect()
}

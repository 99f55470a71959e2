//! Aggregate views over a [`Snapshot`](nexus_inventory::Snapshot).
//!
//! Views are pure functions of the snapshot they are given and are recomputed on every
//! call; nothing here caches or mutates state.

pub mod activity;
pub mod categories;
pub mod search;
pub mod stock_status;
pub mod valuation;

pub use activity::{
    ActivityRow, MovementSummary, adjustment_count, inbound_volume, movement_summary,
    outbound_volume, outbound_volume_since, recent_activity,
};
pub use categories::{CategoryCount, category_distribution};
pub use search::{search_products, search_transactions};
pub use stock_status::{StockStatus, low_stock, out_of_stock, status_of};
pub use valuation::{ValuationSummary, total_inventory_value, total_units, valuation_summary};

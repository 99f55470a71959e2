use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use nexus_ai::{HeuristicInsightProvider, InsightService};
use nexus_infra::persistence::{FileStore, InMemoryStore, KeyValueStore};
use nexus_infra::projections::{
    category_distribution, low_stock, movement_summary, recent_activity, valuation_summary,
};
use nexus_infra::{Console, ConsoleConfig, insights};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    nexus_observability::init();

    let config = ConsoleConfig::from_env().context("invalid NEXUS_* configuration")?;
    let store: Box<dyn KeyValueStore> = match &config.data_dir {
        Some(dir) => Box::new(
            FileStore::open(dir).with_context(|| format!("failed to open data directory {}", dir.display()))?,
        ),
        None => Box::new(InMemoryStore::new()),
    };
    let timeout = config.insight_timeout;
    let expiry_days = config.insight_expiry_days;
    let console = Console::open(store, config);
    let snapshot = console.snapshot();

    let summary = valuation_summary(snapshot);
    let movements = movement_summary(snapshot);
    println!("== Nexus Stock dashboard ==");
    println!("Signed in as   : {} ({})", snapshot.current_user().name, snapshot.current_user().role.as_str());
    println!("Inventory value: {:.2}", summary.total_value);
    println!("Units on hand  : {}", summary.total_units);
    println!("Low stock      : {}", summary.low_stock_count);
    println!(
        "Movements      : {} in / {} out / {} adjustments",
        movements.inbound_units, movements.outbound_units, movements.adjustments
    );

    println!("\n-- Categories --");
    for slice in category_distribution(snapshot) {
        println!("{:<20} {}", slice.name, slice.count);
    }

    println!("\n-- Low stock report --");
    for p in low_stock(snapshot) {
        println!("{:<10} {:<24} {:>6} / reorder at {}", p.sku, p.name, p.quantity, p.reorder_level);
    }

    println!("\n-- Recent activity --");
    for row in recent_activity(snapshot, 5) {
        let t = row.transaction;
        println!("{} {:<10} {:>5}  {}", t.date.format("%Y-%m-%d %H:%M"), t.movement.as_str(), t.quantity, row.product_label);
    }

    let service = InsightService::new(
        Arc::new(HeuristicInsightProvider::new().with_expiry_window_days(expiry_days)),
        timeout,
    );
    println!("\n-- Insights --");
    match service.request(insights::insight_context(snapshot, Utc::now())).await {
        Ok(report) => println!("{}", report.summary),
        Err(err) => {
            if let Some(message) = err.user_message() {
                println!("{message}");
            }
        }
    }

    Ok(())
}

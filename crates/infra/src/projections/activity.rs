//! Recent activity feed and movement volume cards.

use chrono::{DateTime, Utc};

use nexus_inventory::{MovementType, Snapshot, Transaction};

/// A ledger entry with its product resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow<'a> {
    pub transaction: &'a Transaction,
    /// Product name, or the deleted-asset label for a dangling reference.
    pub product_label: &'a str,
}

/// The `n` most recent movements, newest first.
///
/// Sorting is stable, so entries sharing a timestamp keep their ledger order.
pub fn recent_activity(snapshot: &Snapshot, n: usize) -> Vec<ActivityRow<'_>> {
    let mut rows: Vec<&Transaction> = snapshot.transactions().iter().collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.into_iter()
        .take(n)
        .map(|transaction| ActivityRow {
            transaction,
            product_label: snapshot.product_label(&transaction.product_id),
        })
        .collect()
}

fn volume<'a>(transactions: impl Iterator<Item = &'a Transaction>, movement: MovementType) -> i64 {
    transactions
        .filter(|t| t.movement == movement)
        .map(|t| t.quantity)
        .sum()
}

/// Total OUTBOUND units over the whole ledger (the dashboard's "monthly volume" card).
pub fn outbound_volume(snapshot: &Snapshot) -> i64 {
    volume(snapshot.transactions().iter(), MovementType::Outbound)
}

/// Total OUTBOUND units dated at or after `since`.
pub fn outbound_volume_since(snapshot: &Snapshot, since: DateTime<Utc>) -> i64 {
    volume(
        snapshot.transactions().iter().filter(|t| t.date >= since),
        MovementType::Outbound,
    )
}

pub fn inbound_volume(snapshot: &Snapshot) -> i64 {
    volume(snapshot.transactions().iter(), MovementType::Inbound)
}

/// Number of ADJUSTMENT records (not units: an adjustment's quantity is a target level).
pub fn adjustment_count(snapshot: &Snapshot) -> usize {
    snapshot
        .transactions()
        .iter()
        .filter(|t| t.movement == MovementType::Adjustment)
        .count()
}

/// The three summary cards on the movements screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementSummary {
    pub inbound_units: i64,
    pub outbound_units: i64,
    pub adjustments: usize,
}

pub fn movement_summary(snapshot: &Snapshot) -> MovementSummary {
    MovementSummary {
        inbound_units: inbound_volume(snapshot),
        outbound_units: outbound_volume(snapshot),
        adjustments: adjustment_count(snapshot),
    }
}

//! Append-only, capacity-bounded audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexus_core::{AuditLogId, UserId};

/// Default number of entries kept in the trail.
pub const DEFAULT_AUDIT_CAPACITY: usize = 100;

/// Action tags written to [`AuditLog::action`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AuditAction {
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    Transaction,
    Supplier,
    Category,
    Export,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreateProduct => "CREATE_PRODUCT",
            AuditAction::UpdateProduct => "UPDATE_PRODUCT",
            AuditAction::DeleteProduct => "DELETE_PRODUCT",
            AuditAction::Transaction => "TRANSACTION",
            AuditAction::Supplier => "SUPPLIER",
            AuditAction::Category => "CATEGORY",
            AuditAction::Export => "EXPORT",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit entry.
///
/// `action` stays a plain string on the wire so entries written by older builds with
/// tags this build does not know still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: AuditLogId,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub action: String,
    pub details: String,
}

impl AuditLog {
    pub fn is(&self, action: AuditAction) -> bool {
        self.action == action.as_str()
    }
}

/// Audit entries, newest first.
///
/// Entries cannot be edited or removed one by one; only the oldest entries are evicted
/// once the trail exceeds its capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail {
    entries: Vec<AuditLog>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a fresh entry and evict everything beyond `capacity`.
    pub fn record(
        &mut self,
        action: AuditAction,
        details: impl Into<String>,
        user_id: UserId,
        at: DateTime<Utc>,
        capacity: usize,
    ) -> AuditLog {
        let entry = AuditLog {
            id: AuditLogId::generate(),
            timestamp: at,
            user_id,
            action: action.as_str().to_string(),
            details: details.into(),
        };
        self.entries.insert(0, entry.clone());
        self.entries.truncate(capacity);
        entry
    }

    /// Evict the oldest entries beyond `capacity`, e.g. after loading a trail written
    /// under a larger capacity.
    pub fn enforce_capacity(&mut self, capacity: usize) {
        self.entries.truncate(capacity);
    }

    pub fn entries(&self) -> &[AuditLog] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&AuditLog> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuditLog> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record_n(trail: &mut AuditTrail, n: usize, capacity: usize) {
        for i in 0..n {
            trail.record(
                AuditAction::Transaction,
                format!("action #{i}"),
                UserId::from("u1"),
                Utc::now(),
                capacity,
            );
        }
    }

    #[test]
    fn keeps_newest_first_and_evicts_oldest() {
        let mut trail = AuditTrail::new();
        record_n(&mut trail, 150, DEFAULT_AUDIT_CAPACITY);

        assert_eq!(trail.len(), 100);
        assert_eq!(trail.entries()[0].details, "action #149");
        assert_eq!(trail.entries()[99].details, "action #50");
        assert!(trail.iter().all(|e| e.details != "action #49"));
    }

    #[test]
    fn record_returns_the_stored_entry() {
        let mut trail = AuditTrail::new();
        let entry = trail.record(
            AuditAction::Export,
            "Generated inventory CSV report",
            UserId::from("u1"),
            Utc::now(),
            DEFAULT_AUDIT_CAPACITY,
        );
        assert_eq!(trail.latest(), Some(&entry));
        assert!(entry.is(AuditAction::Export));
    }

    #[test]
    fn enforce_capacity_trims_a_loaded_trail_to_the_newest_entries() {
        let mut trail = AuditTrail::new();
        record_n(&mut trail, 40, DEFAULT_AUDIT_CAPACITY);

        trail.enforce_capacity(10);
        assert_eq!(trail.len(), 10);
        assert_eq!(trail.entries()[0].details, "action #39");
        assert_eq!(trail.entries()[9].details, "action #30");

        trail.enforce_capacity(50);
        assert_eq!(trail.len(), 10);
    }

    proptest! {
        /// Property: the trail never exceeds its capacity and always holds the newest entry.
        #[test]
        fn never_exceeds_capacity(n in 0usize..300, capacity in 1usize..120) {
            let mut trail = AuditTrail::new();
            record_n(&mut trail, n, capacity);

            prop_assert_eq!(trail.len(), n.min(capacity));
            if n > 0 {
                let newest = format!("action #{}", n - 1);
                prop_assert_eq!(&trail.entries()[0].details, &newest);
            }
        }
    }
}

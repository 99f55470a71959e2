//! Session command pipeline.
//!
//! The `Console` owns the current snapshot of one signed-in session and runs every
//! command through the same steps:
//!
//! ```text
//! Command
//!   ↓
//! 1. Session check (signed in)
//!   ↓
//! 2. Snapshot::execute (authorize → decide → apply on a clone → audit)
//!   ↓
//! 3. Swap in the new snapshot
//!   ↓
//! 4. Persist the snapshot (failures are logged, never rolled back)
//!   ↓
//! 5. Publish the applied events to subscribers
//! ```
//!
//! Commands run sequentially; `&mut self` is the only writer.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::instrument;

use nexus_auth::User;
use nexus_core::{CategoryId, DomainError, ProductId, ReferenceKind, SupplierId, find_by_id};
use nexus_events::{EventBus, InMemoryEventBus, SignalBus};
use nexus_inventory::{
    Category, CreateCategory, CreateProduct, DeleteProduct, ExportReport, LedgerCommand,
    LedgerContext, LedgerEvent, Movement, OnboardSupplier, Product, ProductDraft, ProductPatch,
    RecordMovement, ReportKind, Snapshot, Supplier, SupplierDraft, Transition, UpdateProduct,
};

use crate::config::ConsoleConfig;
use crate::persistence::{SnapshotStore, load_or_default};
use crate::reports::{self, CsvReport, ReportError};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("sign in required")]
    NotAuthenticated,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Debug)]
pub struct Console<S> {
    snapshot: Snapshot,
    config: ConsoleConfig,
    store: S,
    authenticated: bool,
    events: InMemoryEventBus<LedgerEvent>,
    signals: SignalBus,
}

impl<S> Console<S>
where
    S: SnapshotStore,
{
    /// Restore the session from `store`, falling back to the demo data.
    pub fn open(store: S, config: ConsoleConfig) -> Self {
        let snapshot = load_or_default(&store, Utc::now()).with_audit_capacity(config.audit_capacity());
        let authenticated = store.load_auth_flag().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "auth flag unreadable, treating session as signed out");
            false
        });

        tracing::info!(
            products = snapshot.products().len(),
            transactions = snapshot.transactions().len(),
            authenticated,
            "console session opened"
        );

        Self {
            snapshot,
            config,
            store,
            authenticated,
            events: InMemoryEventBus::new(),
            signals: SignalBus::new(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Ledger events applied by this console, for views that follow changes.
    pub fn events(&self) -> &InMemoryEventBus<LedgerEvent> {
        &self.events
    }

    pub fn signals(&self) -> &SignalBus {
        &self.signals
    }

    pub fn login(&mut self) {
        self.set_authenticated(true);
    }

    pub fn logout(&mut self) {
        self.set_authenticated(false);
    }

    fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        if let Err(err) = self.store.save_auth_flag(authenticated) {
            tracing::error!(error = %err, authenticated, "failed to persist auth flag");
        }
        tracing::info!(authenticated, user = %self.snapshot.current_user().id, "session state changed");
    }

    /// Act as another user within the signed-in session (demo and admin tooling).
    ///
    /// Not a ledger command, so it leaves no audit entry.
    pub fn switch_user(&mut self, user: User) -> Result<(), ConsoleError> {
        if !self.authenticated {
            tracing::warn!(user = %user.id, "user switch rejected, no signed-in session");
            return Err(ConsoleError::NotAuthenticated);
        }
        tracing::info!(
            from = %self.snapshot.current_user().id,
            to = %user.id,
            role = user.role.as_str(),
            "current user switched"
        );
        self.snapshot = self.snapshot.clone().with_current_user(user);
        self.persist();
        Ok(())
    }

    /// "Quick add": ask the inventory view to open an empty product form.
    pub fn request_product_form(&self) {
        if let Err(err) = self.signals.request_product_form() {
            tracing::error!(?err, "failed to publish product form signal");
        }
    }

    fn context(&self) -> LedgerContext {
        LedgerContext::new(self.snapshot.current_user().clone(), self.config.policy.clone())
    }

    fn persist(&self) {
        if let Err(err) = self.store.save_snapshot(&self.snapshot) {
            tracing::error!(error = %err, "failed to persist snapshot");
        }
    }

    /// Run one command through the full pipeline.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub fn dispatch(&mut self, command: LedgerCommand) -> Result<Transition, ConsoleError> {
        if !self.authenticated {
            tracing::warn!("command rejected, no signed-in session");
            return Err(ConsoleError::NotAuthenticated);
        }

        let ctx = self.context();
        let transition = match self.snapshot.execute(&command, &ctx) {
            Ok(transition) => transition,
            Err(err) => {
                tracing::warn!(actor = %ctx.actor.id, error = %err, "command rejected");
                return Err(err.into());
            }
        };

        self.snapshot = transition.snapshot.clone();
        self.persist();

        for event in &transition.events {
            if let Err(err) = self.events.publish(event.clone()) {
                tracing::error!(?err, "failed to publish ledger event");
            }
        }

        if let Some(entry) = transition.audit.first() {
            tracing::info!(
                actor = %ctx.actor.id,
                action = %entry.action,
                details = %entry.details,
                "command applied"
            );
        }

        Ok(transition)
    }

    fn current_product(&self, id: &ProductId) -> Result<Product, ConsoleError> {
        self.snapshot
            .product(id)
            .cloned()
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Product, id).into())
    }

    pub fn create_product(&mut self, draft: ProductDraft) -> Result<Product, ConsoleError> {
        let cmd = CreateProduct::new(draft);
        let id = cmd.product_id.clone();
        self.dispatch(LedgerCommand::CreateProduct(cmd))?;
        self.current_product(&id)
    }

    pub fn update_product(&mut self, id: ProductId, patch: ProductPatch) -> Result<Product, ConsoleError> {
        self.dispatch(LedgerCommand::UpdateProduct(UpdateProduct::new(id.clone(), patch)))?;
        self.current_product(&id)
    }

    pub fn delete_product(&mut self, id: ProductId) -> Result<(), ConsoleError> {
        self.dispatch(LedgerCommand::DeleteProduct(DeleteProduct::new(id)))?;
        Ok(())
    }

    pub fn record_movement(&mut self, cmd: RecordMovement) -> Result<Movement, ConsoleError> {
        let product_id = cmd.product_id.clone();
        let transaction_id = cmd.transaction_id.clone();
        self.dispatch(LedgerCommand::RecordMovement(cmd))?;

        let product = self.current_product(&product_id)?;
        let transaction = find_by_id(self.snapshot.transactions(), &transaction_id)
            .cloned()
            .ok_or_else(|| DomainError::invalid_id(format!("transaction {transaction_id} missing")))?;
        Ok(Movement { product, transaction })
    }

    pub fn onboard_supplier(&mut self, draft: SupplierDraft) -> Result<Supplier, ConsoleError> {
        let cmd = OnboardSupplier::new(draft);
        let id: SupplierId = cmd.supplier_id.clone();
        self.dispatch(LedgerCommand::OnboardSupplier(cmd))?;
        self.snapshot
            .supplier(&id)
            .cloned()
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Supplier, &id).into())
    }

    pub fn create_category(&mut self, name: impl Into<String>) -> Result<Category, ConsoleError> {
        let cmd = CreateCategory::new(name);
        let id: CategoryId = cmd.category_id.clone();
        self.dispatch(LedgerCommand::CreateCategory(cmd))?;
        self.snapshot
            .category(&id)
            .cloned()
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Category, &id).into())
    }

    /// Render a CSV report of the current state and record the export in the audit trail.
    ///
    /// The report reflects the state before the export entry is added.
    pub fn export_report(&mut self, kind: ReportKind, date: NaiveDate) -> Result<CsvReport, ConsoleError> {
        if !self.authenticated {
            return Err(ConsoleError::NotAuthenticated);
        }
        let report = reports::render(&self.snapshot, kind, date)?;
        self.dispatch(LedgerCommand::ExportReport(ExportReport::new(kind)))?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{CORRUPT_SNAPSHOT_KEY, InMemoryStore, KeyValueStore, SNAPSHOT_KEY};
    use nexus_auth::Role;
    use nexus_events::UiSignal;
    use nexus_inventory::{AuditAction, LedgerPolicy, MovementType};

    fn signed_in() -> Console<InMemoryStore> {
        let mut console = Console::open(InMemoryStore::new(), ConsoleConfig::default());
        console.login();
        console
    }

    fn p1() -> ProductId {
        ProductId::from("p1")
    }

    #[test]
    fn fresh_store_opens_on_demo_data_signed_out() {
        let console = Console::open(InMemoryStore::new(), ConsoleConfig::default());
        assert!(!console.is_authenticated());
        assert_eq!(console.snapshot().products().len(), 3);
    }

    #[test]
    fn commands_require_a_session() {
        let mut console = Console::open(InMemoryStore::new(), ConsoleConfig::default());
        let err = console
            .record_movement(RecordMovement::new(p1(), MovementType::Inbound, 1, ""))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::NotAuthenticated));
        assert!(console.snapshot().logs().is_empty());
    }

    #[test]
    fn applied_command_is_persisted_and_published() {
        let mut console = signed_in();
        let feed = console.events().subscribe();

        let movement = console
            .record_movement(RecordMovement::new(p1(), MovementType::Inbound, 5, "restock"))
            .unwrap();
        assert_eq!(movement.product.quantity, 17);

        let stored = console.store().load_snapshot().unwrap().unwrap();
        assert_eq!(stored.product(&p1()).unwrap().quantity, 17);
        assert_eq!(stored.logs().len(), 1);

        let published = feed.drain();
        assert_eq!(published.len(), 1);
        assert!(matches!(published[0], LedgerEvent::MovementRecorded(_)));
    }

    #[test]
    fn rejected_command_changes_nothing() {
        let mut console = signed_in();
        let before = console.snapshot().clone();

        let err = console
            .record_movement(RecordMovement::new(p1(), MovementType::Outbound, 500, ""))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Domain(DomainError::InsufficientStock { .. })));
        assert_eq!(console.snapshot(), &before);
        assert_eq!(console.store().load_snapshot().unwrap(), None);
    }

    #[test]
    fn session_survives_reopen() {
        let mut console = signed_in();
        console.create_category("Beverages").unwrap();

        let Console { store, .. } = console;
        let reopened = Console::open(store, ConsoleConfig::default());
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.snapshot().categories().len(), 4);
    }

    #[test]
    fn staff_cannot_delete_but_admin_can() {
        let mut console = signed_in();
        console.switch_user(User::new("u2", "Sam", "sam@example.com", Role::Staff)).unwrap();

        let err = console.delete_product(p1()).unwrap_err();
        assert!(matches!(err, ConsoleError::Domain(DomainError::Unauthorized(_))));

        console.switch_user(User::new("u1", "Sarah Connor", "admin@nexusstock.com", Role::Admin)).unwrap();
        console.delete_product(p1()).unwrap();
        assert!(console.snapshot().product(&p1()).is_none());
    }

    #[test]
    fn export_returns_report_and_audits() {
        let mut console = signed_in();
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let report = console.export_report(ReportKind::Inventory, date).unwrap();
        assert_eq!(report.file_name, "inventory_report_2024-02-01.csv");
        assert_eq!(report.content.lines().count(), 4);

        let latest = console.snapshot().logs().latest().unwrap();
        assert!(latest.is(AuditAction::Export));
        assert_eq!(latest.details, "Generated inventory CSV report");
    }

    #[test]
    fn quick_add_signals_the_inventory_view() {
        let console = signed_in();
        let inventory_view = console.signals().subscribe();
        console.request_product_form();
        assert_eq!(inventory_view.drain(), vec![UiSignal::OpenProductForm]);
    }

    #[test]
    fn switching_user_requires_a_session() {
        let mut console = Console::open(InMemoryStore::new(), ConsoleConfig::default());
        let err = console
            .switch_user(User::new("u7", "Eve", "eve@example.com", Role::Admin))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::NotAuthenticated));
        assert_eq!(console.snapshot().current_user().id.as_str(), "u1");
        assert_eq!(console.store().load_snapshot().unwrap(), None);
    }

    #[test]
    fn unreadable_stored_state_survives_the_next_save() {
        let store = InMemoryStore::new();
        let blob = r#"{"products":[{"id":"p1","quantity":2.5}]}"#;
        store.put(SNAPSHOT_KEY, blob).unwrap();

        let mut console = Console::open(store, ConsoleConfig::default());
        console.login();
        console.create_category("Beverages").unwrap();

        assert_eq!(console.store().get(CORRUPT_SNAPSHOT_KEY).unwrap().as_deref(), Some(blob));
        assert_eq!(console.store().load_snapshot().unwrap().unwrap().categories().len(), 4);
    }

    #[test]
    fn stored_audit_trail_is_trimmed_to_configured_capacity() {
        let mut console = signed_in();
        for i in 0..12 {
            console.create_category(format!("Category {i}")).unwrap();
        }
        assert_eq!(console.snapshot().logs().len(), 12);

        let Console { store, .. } = console;
        let config = ConsoleConfig {
            policy: LedgerPolicy::default().with_audit_capacity(5),
            ..ConsoleConfig::default()
        };
        let reopened = Console::open(store, config);
        let logs = reopened.snapshot().logs();
        assert_eq!(logs.len(), 5);
        assert_eq!(logs.latest().unwrap().details, "Created category Category 11");
    }

    #[test]
    fn logout_is_persisted() {
        let mut console = signed_in();
        console.logout();
        assert!(!console.store().load_auth_flag().unwrap());
    }
}

//! The complete in-memory state of a console session.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use nexus_auth::{Role, User};
use nexus_core::{
    Aggregate, CategoryId, DomainError, DomainResult, ProductId, ReferenceKind, SupplierId,
    find_by_id,
};

use crate::audit::{AuditLog, AuditTrail};
use crate::catalog::{Category, Supplier};
use crate::ledger::{
    CreateCategory, CreateProduct, DeleteProduct, ExportReport, LedgerCommand, LedgerContext,
    LedgerEvent, OnboardSupplier, RecordMovement, UpdateProduct,
};
use crate::product::Product;
use crate::transaction::{MovementType, Transaction, fold_quantity};

/// Label shown for ledger entries whose product no longer exists.
pub const DELETED_ASSET_LABEL: &str = "Deleted Asset";

/// Snapshot of every entity at one point in time.
///
/// Snapshots are immutable per version: commands go through [`Snapshot::execute`], which
/// leaves `self` untouched and returns the next version. The serialized form is the
/// durable session blob (`{products, categories, suppliers, transactions, currentUser,
/// logs}`); the version counter is process-local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub(crate) products: Vec<Product>,
    #[serde(default)]
    pub(crate) categories: Vec<Category>,
    #[serde(default)]
    pub(crate) suppliers: Vec<Supplier>,
    /// Ledger, newest first.
    #[serde(default)]
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) current_user: User,
    #[serde(default)]
    pub(crate) logs: AuditTrail,
    #[serde(skip)]
    pub(crate) version: u64,
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub snapshot: Snapshot,
    pub events: Vec<LedgerEvent>,
    /// One entry per emitted event (commands emit exactly one).
    pub audit: Vec<AuditLog>,
}

/// New snapshot plus the entity the command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub snapshot: Snapshot,
    pub value: T,
}

/// Outcome of a stock movement.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub product: Product,
    pub transaction: Transaction,
}

impl Snapshot {
    /// Empty snapshot for `current_user`.
    pub fn new(current_user: User) -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            suppliers: Vec::new(),
            transactions: Vec::new(),
            current_user,
            logs: AuditTrail::new(),
            version: 0,
        }
    }

    // Seeding helpers: bypass the ledger and the audit trail.

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories.extend(categories);
        self
    }

    pub fn with_suppliers(mut self, suppliers: impl IntoIterator<Item = Supplier>) -> Self {
        self.suppliers.extend(suppliers);
        self
    }

    pub fn with_products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        self.products.extend(products);
        self
    }

    /// Appends older ledger entries (given newest first) behind the existing ones.
    pub fn with_transactions(mut self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        self.transactions.extend(transactions);
        self
    }

    /// Same state, different signed-in user.
    pub fn with_current_user(mut self, user: User) -> Self {
        self.current_user = user;
        self
    }

    /// Trim the audit trail to `capacity`, keeping the newest entries.
    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.logs.enforce_capacity(capacity);
        self
    }

    /// Demo data shown on first start, before anything has been saved.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let admin = User::new("u1", "Sarah Connor", "admin@nexusstock.com", Role::Admin)
            .with_avatar("https://picsum.photos/seed/sarah/200/200");

        let category = |id: &str, name: &str| Category {
            id: CategoryId::from(id),
            name: name.to_string(),
        };
        let supplier = |id: &str, name: &str, contact: &str, email: &str, phone: &str| Supplier {
            id: SupplierId::from(id),
            name: name.to_string(),
            contact_person: contact.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        };
        let product = |id: &str,
                       sku: &str,
                       name: &str,
                       category_id: &str,
                       supplier_id: &str,
                       price: f64,
                       cost: f64,
                       quantity: i64,
                       reorder_level: u32,
                       unit: &str,
                       batch_number: &str,
                       expiry_date: Option<NaiveDate>| Product {
            id: ProductId::from(id),
            sku: sku.to_string(),
            name: name.to_string(),
            category_id: CategoryId::from(category_id),
            supplier_id: SupplierId::from(supplier_id),
            price,
            cost,
            quantity,
            reorder_level,
            unit: unit.to_string(),
            batch_number: batch_number.to_string(),
            expiry_date,
            last_updated: now,
        };
        let movement = |id: &str, product_id: &str, movement: MovementType, quantity: i64, date: &str, note: &str| {
            Transaction {
                id: id.into(),
                product_id: product_id.into(),
                user_id: "u1".into(),
                movement,
                quantity,
                date: DateTime::parse_from_rfc3339(date)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or(now),
                note: note.to_string(),
            }
        };

        Snapshot::new(admin)
            .with_categories([
                category("c1", "Electronics"),
                category("c2", "Office Supplies"),
                category("c3", "Perishables"),
            ])
            .with_suppliers([
                supplier("s1", "Global Tech Inc", "John Smith", "sales@globaltech.com", "+1-555-0192"),
                supplier("s2", "Office Depot", "Jane Doe", "orders@officedepot.com", "+1-555-0193"),
            ])
            .with_products([
                product("p1", "LAP-001", "MacBook Pro M3", "c1", "s1", 2499.0, 1800.0, 12, 5, "pcs", "B-2024-001", None),
                product("p2", "PEN-022", "Blue Ink Pen Box", "c2", "s2", 15.0, 5.0, 150, 200, "boxes", "B-2023-99", None),
                product(
                    "p3",
                    "MLK-001",
                    "Almond Milk 1L",
                    "c3",
                    "s2",
                    4.5,
                    2.2,
                    45,
                    50,
                    "cartons",
                    "EXP-MAR-24",
                    NaiveDate::from_ymd_opt(2024, 3, 25),
                ),
            ])
            .with_transactions([
                movement("t2", "p2", MovementType::Outbound, 20, "2024-01-12T14:30:00Z", "Customer Sale"),
                movement("t1", "p1", MovementType::Inbound, 5, "2024-01-10T10:00:00Z", "Restock order"),
            ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    /// Ledger, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn current_user(&self) -> &User {
        &self.current_user
    }

    pub fn logs(&self) -> &AuditTrail {
        &self.logs
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        find_by_id(&self.products, id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn supplier(&self, id: &SupplierId) -> Option<&Supplier> {
        find_by_id(&self.suppliers, id)
    }

    /// Product name, or [`DELETED_ASSET_LABEL`] for a dangling reference.
    pub fn product_label(&self, id: &ProductId) -> &str {
        self.product(id)
            .map(|p| p.name.as_str())
            .unwrap_or(DELETED_ASSET_LABEL)
    }

    /// Ledger entries for one product, in chronological order.
    ///
    /// Ordered by date; entries sharing a timestamp keep their insertion order.
    pub fn history_of(&self, id: &ProductId) -> Vec<&Transaction> {
        let mut history: Vec<&Transaction> = self
            .transactions
            .iter()
            .rev()
            .filter(|t| &t.product_id == id)
            .collect();
        history.sort_by_key(|t| t.date);
        history
    }

    /// Re-derive a product's quantity by folding its history over `opening`.
    pub fn replay_quantity(&self, id: &ProductId, opening: i64) -> i64 {
        fold_quantity(
            opening,
            self.history_of(id).into_iter().map(|t| (t.movement, t.quantity)),
        )
    }

    /// Authorize, decide and apply one command.
    ///
    /// `self` is never modified. On success the returned snapshot carries the applied
    /// events and exactly one new audit entry per event. Any error leaves no trace.
    pub fn execute(&self, command: &LedgerCommand, ctx: &LedgerContext) -> DomainResult<Transition> {
        nexus_auth::authorize(&ctx.actor, command.required_permission())?;

        let events = self.handle(command, ctx)?;

        let mut next = self.clone();
        let mut audit = Vec::with_capacity(events.len());
        for event in &events {
            next.apply(event);
            audit.push(next.logs.record(
                event.audit_action(),
                event.audit_details(),
                ctx.actor.id.clone(),
                nexus_events::Event::occurred_at(event),
                ctx.policy.audit_capacity,
            ));
        }

        tracing::debug!(
            command = command.name(),
            version = next.version,
            "ledger command applied"
        );

        Ok(Transition {
            snapshot: next,
            events,
            audit,
        })
    }

    fn applied_product(transition: Transition, id: &ProductId) -> DomainResult<Applied<Product>> {
        let value = transition
            .snapshot
            .product(id)
            .cloned()
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Product, id))?;
        Ok(Applied {
            snapshot: transition.snapshot,
            value,
        })
    }

    pub fn create_product(&self, cmd: CreateProduct, ctx: &LedgerContext) -> DomainResult<Applied<Product>> {
        let id = cmd.product_id.clone();
        let transition = self.execute(&LedgerCommand::CreateProduct(cmd), ctx)?;
        Self::applied_product(transition, &id)
    }

    pub fn update_product(&self, cmd: UpdateProduct, ctx: &LedgerContext) -> DomainResult<Applied<Product>> {
        let id = cmd.product_id.clone();
        let transition = self.execute(&LedgerCommand::UpdateProduct(cmd), ctx)?;
        Self::applied_product(transition, &id)
    }

    /// Remove a product. Admin only; its ledger entries stay.
    pub fn delete_product(&self, cmd: DeleteProduct, ctx: &LedgerContext) -> DomainResult<Snapshot> {
        Ok(self.execute(&LedgerCommand::DeleteProduct(cmd), ctx)?.snapshot)
    }

    /// Apply one stock movement, returning the updated product and the new ledger entry.
    pub fn apply_movement(&self, cmd: RecordMovement, ctx: &LedgerContext) -> DomainResult<Applied<Movement>> {
        let product_id = cmd.product_id.clone();
        let transaction_id = cmd.transaction_id.clone();
        let transition = self.execute(&LedgerCommand::RecordMovement(cmd), ctx)?;

        let product = transition
            .snapshot
            .product(&product_id)
            .cloned()
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Product, &product_id))?;
        let transaction = find_by_id(&transition.snapshot.transactions, &transaction_id)
            .cloned()
            .ok_or_else(|| DomainError::invalid_id(format!("transaction {transaction_id} missing")))?;

        Ok(Applied {
            snapshot: transition.snapshot,
            value: Movement { product, transaction },
        })
    }

    pub fn onboard_supplier(&self, cmd: OnboardSupplier, ctx: &LedgerContext) -> DomainResult<Applied<Supplier>> {
        let id = cmd.supplier_id.clone();
        let transition = self.execute(&LedgerCommand::OnboardSupplier(cmd), ctx)?;
        let value = transition
            .snapshot
            .supplier(&id)
            .cloned()
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Supplier, &id))?;
        Ok(Applied {
            snapshot: transition.snapshot,
            value,
        })
    }

    pub fn create_category(&self, cmd: CreateCategory, ctx: &LedgerContext) -> DomainResult<Applied<Category>> {
        let id = cmd.category_id.clone();
        let transition = self.execute(&LedgerCommand::CreateCategory(cmd), ctx)?;
        let value = transition
            .snapshot
            .category(&id)
            .cloned()
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Category, &id))?;
        Ok(Applied {
            snapshot: transition.snapshot,
            value,
        })
    }

    /// Record that a report was exported (audit only).
    pub fn export_report(&self, cmd: ExportReport, ctx: &LedgerContext) -> DomainResult<Snapshot> {
        Ok(self.execute(&LedgerCommand::ExportReport(cmd), ctx)?.snapshot)
    }
}

//! Ledger engine: commands, events and the decision logic that turns one into the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexus_auth::{Permission, User};
use nexus_core::{
    Aggregate, CategoryId, DomainError, DomainResult, ProductId, ReferenceKind, SupplierId,
    TransactionId, find_by_id,
};
use nexus_events::Event;

use crate::audit::AuditAction;
use crate::catalog::{Category, Supplier, SupplierDraft};
use crate::policy::{LedgerPolicy, NegativeStockPolicy};
use crate::product::{Product, ProductDraft, ProductPatch};
use crate::snapshot::Snapshot;
use crate::transaction::{MovementType, Transaction};

/// Who is acting, and under which policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerContext {
    pub actor: User,
    pub policy: LedgerPolicy,
}

impl LedgerContext {
    pub fn new(actor: User, policy: LedgerPolicy) -> Self {
        Self { actor, policy }
    }
}

/// Which flat report was exported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Inventory,
    Movements,
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub draft: ProductDraft,
    pub occurred_at: DateTime<Utc>,
}

impl CreateProduct {
    pub fn new(draft: ProductDraft) -> Self {
        Self {
            product_id: ProductId::generate(),
            draft,
            occurred_at: Utc::now(),
        }
    }
}

/// Command: UpdateProduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub product_id: ProductId,
    pub patch: ProductPatch,
    pub occurred_at: DateTime<Utc>,
}

impl UpdateProduct {
    pub fn new(product_id: ProductId, patch: ProductPatch) -> Self {
        Self {
            product_id,
            patch,
            occurred_at: Utc::now(),
        }
    }
}

/// Command: DeleteProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProduct {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

impl DeleteProduct {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            occurred_at: Utc::now(),
        }
    }
}

/// Command: RecordMovement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMovement {
    pub transaction_id: TransactionId,
    pub product_id: ProductId,
    pub movement: MovementType,
    /// Positive amount for INBOUND/OUTBOUND, absolute target for ADJUSTMENT.
    pub quantity: i64,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
}

impl RecordMovement {
    pub fn new(
        product_id: ProductId,
        movement: MovementType,
        quantity: i64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: TransactionId::generate(),
            product_id,
            movement,
            quantity,
            note: note.into(),
            occurred_at: Utc::now(),
        }
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }
}

/// Command: OnboardSupplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardSupplier {
    pub supplier_id: SupplierId,
    pub draft: SupplierDraft,
    pub occurred_at: DateTime<Utc>,
}

impl OnboardSupplier {
    pub fn new(draft: SupplierDraft) -> Self {
        Self {
            supplier_id: SupplierId::generate(),
            draft,
            occurred_at: Utc::now(),
        }
    }
}

/// Command: CreateCategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub category_id: CategoryId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

impl CreateCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            category_id: CategoryId::generate(),
            name: name.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Command: ExportReport. Changes no entity; exists so exports reach the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    pub report: ReportKind,
    pub occurred_at: DateTime<Utc>,
}

impl ExportReport {
    pub fn new(report: ReportKind) -> Self {
        Self {
            report,
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerCommand {
    CreateProduct(CreateProduct),
    UpdateProduct(UpdateProduct),
    DeleteProduct(DeleteProduct),
    RecordMovement(RecordMovement),
    OnboardSupplier(OnboardSupplier),
    CreateCategory(CreateCategory),
    ExportReport(ExportReport),
}

impl LedgerCommand {
    /// Capability the acting user must hold.
    pub fn required_permission(&self) -> Permission {
        match self {
            LedgerCommand::CreateProduct(_) => Permission::ProductCreate,
            LedgerCommand::UpdateProduct(_) => Permission::ProductUpdate,
            LedgerCommand::DeleteProduct(_) => Permission::ProductDelete,
            LedgerCommand::RecordMovement(_) => Permission::MovementRecord,
            LedgerCommand::OnboardSupplier(_) => Permission::SupplierOnboard,
            LedgerCommand::CreateCategory(_) => Permission::CategoryCreate,
            LedgerCommand::ExportReport(_) => Permission::ReportExport,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::CreateProduct(_) => "create_product",
            LedgerCommand::UpdateProduct(_) => "update_product",
            LedgerCommand::DeleteProduct(_) => "delete_product",
            LedgerCommand::RecordMovement(_) => "record_movement",
            LedgerCommand::OnboardSupplier(_) => "onboard_supplier",
            LedgerCommand::CreateCategory(_) => "create_category",
            LedgerCommand::ExportReport(_) => "export_report",
        }
    }
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product: Product,
}

/// Event: ProductUpdated (carries the resulting product).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdated {
    pub product: Product,
}

/// Event: ProductDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDeleted {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MovementRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecorded {
    pub transaction: Transaction,
    pub product_name: String,
    pub resulting_quantity: i64,
}

/// Event: SupplierOnboarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierOnboarded {
    pub supplier: Supplier,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CategoryCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCreated {
    pub category: Category,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReportExported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportExported {
    pub report: ReportKind,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    ProductCreated(ProductCreated),
    ProductUpdated(ProductUpdated),
    ProductDeleted(ProductDeleted),
    MovementRecorded(MovementRecorded),
    SupplierOnboarded(SupplierOnboarded),
    CategoryCreated(CategoryCreated),
    ReportExported(ReportExported),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ProductCreated(_) => "ledger.product.created",
            LedgerEvent::ProductUpdated(_) => "ledger.product.updated",
            LedgerEvent::ProductDeleted(_) => "ledger.product.deleted",
            LedgerEvent::MovementRecorded(_) => "ledger.movement.recorded",
            LedgerEvent::SupplierOnboarded(_) => "ledger.supplier.onboarded",
            LedgerEvent::CategoryCreated(_) => "ledger.category.created",
            LedgerEvent::ReportExported(_) => "ledger.report.exported",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::ProductCreated(e) => e.product.last_updated,
            LedgerEvent::ProductUpdated(e) => e.product.last_updated,
            LedgerEvent::ProductDeleted(e) => e.occurred_at,
            LedgerEvent::MovementRecorded(e) => e.transaction.date,
            LedgerEvent::SupplierOnboarded(e) => e.occurred_at,
            LedgerEvent::CategoryCreated(e) => e.occurred_at,
            LedgerEvent::ReportExported(e) => e.occurred_at,
        }
    }
}

impl LedgerEvent {
    pub fn audit_action(&self) -> AuditAction {
        match self {
            LedgerEvent::ProductCreated(_) => AuditAction::CreateProduct,
            LedgerEvent::ProductUpdated(_) => AuditAction::UpdateProduct,
            LedgerEvent::ProductDeleted(_) => AuditAction::DeleteProduct,
            LedgerEvent::MovementRecorded(_) => AuditAction::Transaction,
            LedgerEvent::SupplierOnboarded(_) => AuditAction::Supplier,
            LedgerEvent::CategoryCreated(_) => AuditAction::Category,
            LedgerEvent::ReportExported(_) => AuditAction::Export,
        }
    }

    /// Human-readable audit line.
    pub fn audit_details(&self) -> String {
        match self {
            LedgerEvent::ProductCreated(e) => {
                format!("Added new product {} to inventory", e.product.name)
            }
            LedgerEvent::ProductUpdated(e) => format!(
                "Updated product details for {} ({})",
                e.product.name, e.product.sku
            ),
            LedgerEvent::ProductDeleted(e) => format!(
                "Admin permanently removed product {} (SKU: {})",
                e.name, e.sku
            ),
            LedgerEvent::MovementRecorded(e) => format!(
                "Manually added {} for {}",
                e.transaction.movement, e.product_name
            ),
            LedgerEvent::SupplierOnboarded(e) => {
                format!("Onboarded new partner: {}", e.supplier.name)
            }
            LedgerEvent::CategoryCreated(e) => format!("Created category {}", e.category.name),
            LedgerEvent::ReportExported(e) => match e.report {
                ReportKind::Inventory => "Generated inventory CSV report".to_string(),
                ReportKind::Movements => "Generated transaction history report".to_string(),
            },
        }
    }
}

impl Aggregate for Snapshot {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Context = LedgerContext;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::ProductCreated(e) => {
                self.products.push(e.product.clone());
            }
            LedgerEvent::ProductUpdated(e) => {
                if let Some(slot) = self.products.iter_mut().find(|p| p.id == e.product.id) {
                    *slot = e.product.clone();
                }
            }
            LedgerEvent::ProductDeleted(e) => {
                self.products.retain(|p| p.id != e.product_id);
            }
            LedgerEvent::MovementRecorded(e) => {
                if let Some(product) = self
                    .products
                    .iter_mut()
                    .find(|p| p.id == e.transaction.product_id)
                {
                    product.quantity = e.resulting_quantity;
                    product.last_updated = e.transaction.date;
                }
                // Newest first is the externally visible ledger order.
                self.transactions.insert(0, e.transaction.clone());
            }
            LedgerEvent::SupplierOnboarded(e) => {
                self.suppliers.push(e.supplier.clone());
            }
            LedgerEvent::CategoryCreated(e) => {
                self.categories.push(e.category.clone());
            }
            LedgerEvent::ReportExported(_) => {}
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(
        &self,
        command: &Self::Command,
        ctx: &Self::Context,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::CreateProduct(cmd) => self.handle_create(cmd, ctx),
            LedgerCommand::UpdateProduct(cmd) => self.handle_update(cmd, ctx),
            LedgerCommand::DeleteProduct(cmd) => self.handle_delete(cmd),
            LedgerCommand::RecordMovement(cmd) => self.handle_movement(cmd, ctx),
            LedgerCommand::OnboardSupplier(cmd) => self.handle_onboard(cmd),
            LedgerCommand::CreateCategory(cmd) => self.handle_category(cmd),
            LedgerCommand::ExportReport(cmd) => Ok(vec![LedgerEvent::ReportExported(ReportExported {
                report: cmd.report,
                occurred_at: cmd.occurred_at,
            })]),
        }
    }
}

impl Snapshot {
    fn ensure_references(&self, product: &Product) -> DomainResult<()> {
        if self.category(&product.category_id).is_none() {
            return Err(DomainError::unknown(ReferenceKind::Category, &product.category_id));
        }
        if self.supplier(&product.supplier_id).is_none() {
            return Err(DomainError::unknown(ReferenceKind::Supplier, &product.supplier_id));
        }
        Ok(())
    }

    fn ensure_unique_sku(&self, product: &Product, ctx: &LedgerContext) -> DomainResult<()> {
        if !ctx.policy.unique_sku {
            return Ok(());
        }
        if let Some(other) = self
            .products
            .iter()
            .find(|p| p.id != product.id && p.sku.eq_ignore_ascii_case(&product.sku))
        {
            return Err(DomainError::validation(format!(
                "SKU '{}' is already used by product {}",
                product.sku, other.id
            )));
        }
        Ok(())
    }

    fn ensure_stock_level(product: &Product) -> DomainResult<()> {
        if product.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(())
    }

    fn existing_product(&self, id: &ProductId) -> DomainResult<&Product> {
        self.product(id)
            .ok_or_else(|| DomainError::unknown(ReferenceKind::Product, id))
    }

    fn handle_create(&self, cmd: &CreateProduct, ctx: &LedgerContext) -> DomainResult<Vec<LedgerEvent>> {
        if self.product(&cmd.product_id).is_some() {
            return Err(DomainError::validation(format!(
                "product id {} already exists",
                cmd.product_id
            )));
        }

        let product = cmd
            .draft
            .clone()
            .into_product(cmd.product_id.clone(), cmd.occurred_at);
        product.validate()?;
        Self::ensure_stock_level(&product)?;
        self.ensure_references(&product)?;
        self.ensure_unique_sku(&product, ctx)?;

        Ok(vec![LedgerEvent::ProductCreated(ProductCreated { product })])
    }

    fn handle_update(&self, cmd: &UpdateProduct, ctx: &LedgerContext) -> DomainResult<Vec<LedgerEvent>> {
        let existing = self.existing_product(&cmd.product_id)?;

        let product = existing.patched(&cmd.patch, cmd.occurred_at);
        product.validate()?;
        Self::ensure_stock_level(&product)?;
        self.ensure_references(&product)?;
        self.ensure_unique_sku(&product, ctx)?;

        Ok(vec![LedgerEvent::ProductUpdated(ProductUpdated { product })])
    }

    fn handle_delete(&self, cmd: &DeleteProduct) -> DomainResult<Vec<LedgerEvent>> {
        let existing = self.existing_product(&cmd.product_id)?;

        Ok(vec![LedgerEvent::ProductDeleted(ProductDeleted {
            product_id: existing.id.clone(),
            name: existing.name.clone(),
            sku: existing.sku.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_movement(&self, cmd: &RecordMovement, ctx: &LedgerContext) -> DomainResult<Vec<LedgerEvent>> {
        let product = self.existing_product(&cmd.product_id)?;
        cmd.movement.validate_quantity(cmd.quantity)?;

        if find_by_id(&self.transactions, &cmd.transaction_id).is_some() {
            return Err(DomainError::validation(format!(
                "transaction id {} already exists",
                cmd.transaction_id
            )));
        }

        let resulting_quantity = cmd.movement.apply_to(product.quantity, cmd.quantity);
        // Only withdrawals are guarded; receipts and counts may land on an existing deficit.
        if cmd.movement == MovementType::Outbound
            && resulting_quantity < 0
            && ctx.policy.negative_stock == NegativeStockPolicy::Reject
        {
            return Err(DomainError::InsufficientStock {
                product_id: product.id.to_string(),
                available: product.quantity,
                requested: cmd.quantity,
            });
        }

        Ok(vec![LedgerEvent::MovementRecorded(MovementRecorded {
            transaction: Transaction {
                id: cmd.transaction_id.clone(),
                product_id: product.id.clone(),
                user_id: ctx.actor.id.clone(),
                movement: cmd.movement,
                quantity: cmd.quantity,
                date: cmd.occurred_at,
                note: cmd.note.trim().to_string(),
            },
            product_name: product.name.clone(),
            resulting_quantity,
        })])
    }

    fn handle_onboard(&self, cmd: &OnboardSupplier) -> DomainResult<Vec<LedgerEvent>> {
        cmd.draft.validate()?;
        if self.supplier(&cmd.supplier_id).is_some() {
            return Err(DomainError::validation(format!(
                "supplier id {} already exists",
                cmd.supplier_id
            )));
        }

        Ok(vec![LedgerEvent::SupplierOnboarded(SupplierOnboarded {
            supplier: cmd.draft.clone().into_supplier(cmd.supplier_id.clone()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_category(&self, cmd: &CreateCategory) -> DomainResult<Vec<LedgerEvent>> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        if self.category(&cmd.category_id).is_some() {
            return Err(DomainError::validation(format!(
                "category id {} already exists",
                cmd.category_id
            )));
        }

        Ok(vec![LedgerEvent::CategoryCreated(CategoryCreated {
            category: Category {
                id: cmd.category_id.clone(),
                name: name.to_string(),
            },
            occurred_at: cmd.occurred_at,
        })])
    }
}

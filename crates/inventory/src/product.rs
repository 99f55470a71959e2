use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use nexus_core::{CategoryId, DomainError, Entity, ProductId, SupplierId};

/// Catalog entry with its current stock level.
///
/// `quantity` is maintained by the ledger: every movement updates it in lock-step with
/// the appended transaction. Manual edits go through [`ProductPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    pub price: f64,
    pub cost: f64,
    pub quantity: i64,
    pub reorder_level: u32,
    pub unit: String,
    pub batch_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    pub last_updated: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Product {
    /// At or below the reorder threshold (`quantity <= reorder_level`).
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= i64::from(self.reorder_level)
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Stock value at selling price.
    pub fn stock_value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        ensure_amount("price", self.price)?;
        ensure_amount("cost", self.cost)?;
        if self.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        Ok(())
    }

    /// Returns a copy with `patch` applied and `last_updated` refreshed.
    pub(crate) fn patched(&self, patch: &ProductPatch, at: DateTime<Utc>) -> Product {
        let mut next = self.clone();
        if let Some(sku) = &patch.sku {
            next.sku = sku.trim().to_string();
        }
        if let Some(name) = &patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(category_id) = &patch.category_id {
            next.category_id = category_id.clone();
        }
        if let Some(supplier_id) = &patch.supplier_id {
            next.supplier_id = supplier_id.clone();
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        if let Some(cost) = patch.cost {
            next.cost = cost;
        }
        if let Some(quantity) = patch.quantity {
            next.quantity = quantity;
        }
        if let Some(reorder_level) = patch.reorder_level {
            next.reorder_level = reorder_level;
        }
        if let Some(unit) = &patch.unit {
            next.unit = unit.trim().to_string();
        }
        if let Some(batch_number) = &patch.batch_number {
            next.batch_number = batch_number.clone();
        }
        if let Some(expiry_date) = patch.expiry_date {
            next.expiry_date = expiry_date;
        }
        next.last_updated = at;
        next
    }
}

fn ensure_amount(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a finite, non-negative amount"
        )));
    }
    Ok(())
}

/// Fields supplied when creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    pub price: f64,
    pub cost: f64,
    pub quantity: i64,
    pub reorder_level: u32,
    pub unit: String,
    pub batch_number: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl ProductDraft {
    /// Draft with the console's form defaults: unit `pcs`, reorder point 10, and a
    /// `B-<year>-<n>` batch number derived from the creation time.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        category_id: CategoryId,
        supplier_id: SupplierId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            category_id,
            supplier_id,
            price: 0.0,
            cost: 0.0,
            quantity: 0,
            reorder_level: 10,
            unit: "pcs".to_string(),
            batch_number: default_batch_number(at),
            expiry_date: None,
        }
    }

    pub fn with_pricing(mut self, price: f64, cost: f64) -> Self {
        self.price = price;
        self.cost = cost;
        self
    }

    pub fn with_stock(mut self, quantity: i64, reorder_level: u32) -> Self {
        self.quantity = quantity;
        self.reorder_level = reorder_level;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    pub(crate) fn into_product(self, id: ProductId, at: DateTime<Utc>) -> Product {
        Product {
            id,
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            category_id: self.category_id,
            supplier_id: self.supplier_id,
            price: self.price,
            cost: self.cost,
            quantity: self.quantity,
            reorder_level: self.reorder_level,
            unit: self.unit.trim().to_string(),
            batch_number: self.batch_number,
            expiry_date: self.expiry_date,
            last_updated: at,
        }
    }
}

fn default_batch_number(at: DateTime<Utc>) -> String {
    use chrono::Datelike;
    format!("B-{}-{:03}", at.year(), at.timestamp_subsec_millis())
}

/// Partial update of a product's editable fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub quantity: Option<i64>,
    pub reorder_level: Option<u32>,
    pub unit: Option<String>,
    pub batch_number: Option<String>,
    /// `Some(None)` clears the expiry date.
    pub expiry_date: Option<Option<NaiveDate>>,
}

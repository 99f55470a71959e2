use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// One permission per mutating console command. Serialized as dotted strings
/// (e.g. "product.delete") so capability tables can be dumped for review.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "product.create")]
    ProductCreate,
    #[serde(rename = "product.update")]
    ProductUpdate,
    #[serde(rename = "product.delete")]
    ProductDelete,
    #[serde(rename = "movement.record")]
    MovementRecord,
    #[serde(rename = "supplier.onboard")]
    SupplierOnboard,
    #[serde(rename = "category.create")]
    CategoryCreate,
    #[serde(rename = "report.export")]
    ReportExport,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::ProductCreate,
        Permission::ProductUpdate,
        Permission::ProductDelete,
        Permission::MovementRecord,
        Permission::SupplierOnboard,
        Permission::CategoryCreate,
        Permission::ReportExport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ProductCreate => "product.create",
            Permission::ProductUpdate => "product.update",
            Permission::ProductDelete => "product.delete",
            Permission::MovementRecord => "movement.record",
            Permission::SupplierOnboard => "supplier.onboard",
            Permission::CategoryCreate => "category.create",
            Permission::ReportExport => "report.export",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

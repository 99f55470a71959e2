//! Reference entities: categories and suppliers. Created once, never edited.

use serde::{Deserialize, Serialize};

use nexus_core::{CategoryId, DomainError, Entity, SupplierId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Fields captured by the supplier onboarding form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl SupplierDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact_person: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }

    pub fn with_contact(
        mut self,
        contact_person: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        self.contact_person = contact_person.into();
        self.email = email.into();
        self.phone = phone.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(DomainError::validation("supplier email must contain '@'"));
        }
        Ok(())
    }

    pub(crate) fn into_supplier(self, id: SupplierId) -> Supplier {
        Supplier {
            id,
            name: self.name.trim().to_string(),
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
        }
    }
}

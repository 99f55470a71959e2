use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexus_core::{DomainError, Entity, ProductId, TransactionId, UserId};

/// Kind of stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Goods received: adds to stock.
    Inbound,
    /// Goods shipped: subtracts from stock.
    Outbound,
    /// Stock count correction: `quantity` is the new absolute level, not a delta.
    Adjustment,
}

impl MovementType {
    pub const ALL: [MovementType; 3] = [
        MovementType::Inbound,
        MovementType::Outbound,
        MovementType::Adjustment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Inbound => "INBOUND",
            MovementType::Outbound => "OUTBOUND",
            MovementType::Adjustment => "ADJUSTMENT",
        }
    }

    /// Stock level after applying a movement of `quantity` to `current`.
    pub fn apply_to(self, current: i64, quantity: i64) -> i64 {
        match self {
            MovementType::Inbound => current.saturating_add(quantity),
            MovementType::Outbound => current.saturating_sub(quantity),
            MovementType::Adjustment => quantity,
        }
    }

    /// Checks the quantity carried by a movement of this kind.
    pub fn validate_quantity(self, quantity: i64) -> Result<(), DomainError> {
        match self {
            MovementType::Inbound | MovementType::Outbound if quantity <= 0 => Err(
                DomainError::validation(format!("{} quantity must be a positive integer", self)),
            ),
            MovementType::Adjustment if quantity < 0 => Err(DomainError::validation(
                "ADJUSTMENT target quantity cannot be negative",
            )),
            _ => Ok(()),
        }
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MovementType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INBOUND" => Ok(MovementType::Inbound),
            "OUTBOUND" => Ok(MovementType::Outbound),
            "ADJUSTMENT" => Ok(MovementType::Adjustment),
            other => Err(DomainError::validation(format!("unknown movement type '{other}'"))),
        }
    }
}

/// Immutable ledger entry for one stock movement.
///
/// `product_id` may dangle once the product is deleted; history is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub movement: MovementType,
    pub quantity: i64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Left-fold of movements over an opening quantity.
///
/// INBOUND adds, OUTBOUND subtracts, ADJUSTMENT overwrites. Movements must be given in
/// chronological order.
pub fn fold_quantity<I>(opening: i64, movements: I) -> i64
where
    I: IntoIterator<Item = (MovementType, i64)>,
{
    movements
        .into_iter()
        .fold(opening, |qty, (movement, amount)| movement.apply_to(qty, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_overwrites_instead_of_adding() {
        assert_eq!(MovementType::Adjustment.apply_to(17, 8), 8);
        assert_eq!(MovementType::Inbound.apply_to(12, 5), 17);
        assert_eq!(MovementType::Outbound.apply_to(17, 20), -3);
    }

    #[test]
    fn quantity_rules_depend_on_movement_type() {
        assert!(MovementType::Inbound.validate_quantity(0).is_err());
        assert!(MovementType::Outbound.validate_quantity(-1).is_err());
        assert!(MovementType::Adjustment.validate_quantity(0).is_ok());
        assert!(MovementType::Adjustment.validate_quantity(-1).is_err());
    }

    #[test]
    fn parses_movement_type_case_insensitively() {
        assert_eq!("inbound".parse::<MovementType>().unwrap(), MovementType::Inbound);
        assert_eq!(" OUTBOUND ".parse::<MovementType>().unwrap(), MovementType::Outbound);
        assert!("transfer".parse::<MovementType>().is_err());
    }

    #[test]
    fn transaction_uses_type_field_on_the_wire() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":"t1","productId":"p1","userId":"u1","type":"INBOUND","quantity":5,
                "date":"2024-01-10T10:00:00Z","note":"Restock order"}"#,
        )
        .unwrap();
        assert_eq!(tx.movement, MovementType::Inbound);
        assert_eq!(tx.product_id.as_str(), "p1");
    }

    #[test]
    fn fold_applies_movements_in_order() {
        let moves = [
            (MovementType::Inbound, 5),
            (MovementType::Outbound, 20),
            (MovementType::Adjustment, 8),
            (MovementType::Inbound, 2),
        ];
        assert_eq!(fold_quantity(12, moves), 10);
    }
}

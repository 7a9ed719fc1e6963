use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{EmailAddress, Error, MovementId, ProductId, Result};

/// Kind of stock movement.
///
/// Quantities are always positive; the sign of the stock effect comes from
/// the type. Adjustments carry an explicit direction so a correction can
/// push stock either way, including below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Inflow,
    Outflow,
    AdjustmentIn,
    AdjustmentOut,
}

impl MovementType {
    /// Sign applied to the quantity when aggregating stock.
    pub fn sign(&self) -> i64 {
        match self {
            MovementType::Inflow | MovementType::AdjustmentIn => 1,
            MovementType::Outflow | MovementType::AdjustmentOut => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Inflow => "inflow",
            MovementType::Outflow => "outflow",
            MovementType::AdjustmentIn => "adjustment_in",
            MovementType::AdjustmentOut => "adjustment_out",
        }
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MovementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inflow" => Ok(MovementType::Inflow),
            "outflow" => Ok(MovementType::Outflow),
            "adjustment_in" => Ok(MovementType::AdjustmentIn),
            "adjustment_out" => Ok(MovementType::AdjustmentOut),
            other => Err(Error::validation(format!(
                "movement type must be one of inflow, outflow, adjustment_in, adjustment_out (got {other:?})"
            ))),
        }
    }
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub movement_type: MovementType,
    /// Strictly positive; the semantic sign lives in `movement_type`.
    pub quantity: i64,
    /// Nulled if the acting user is later deleted; the row itself stays.
    pub acting_user: Option<EmailAddress>,
    pub occurred_at: DateTime<Utc>,
}

impl Movement {
    /// The signed contribution of this entry to the product's stock.
    pub fn signed_effect(&self) -> i64 {
        self.movement_type.sign() * self.quantity
    }
}

/// Input for recording a movement.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMovement {
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    pub acting_user_email: EmailAddress,
}

impl NewMovement {
    /// Validate and stamp the entry. Existence of the product and acting
    /// user is the store's concern; only shape is checked here.
    pub fn build(self, now: DateTime<Utc>) -> Result<Movement> {
        if self.quantity <= 0 {
            return Err(Error::validation(format!(
                "movement quantity must be a positive integer (got {})",
                self.quantity
            )));
        }
        Ok(Movement {
            id: MovementId::new(),
            product_id: self.product_id,
            movement_type: self.movement_type,
            quantity: self.quantity,
            acting_user: Some(self.acting_user_email),
            occurred_at: now,
        })
    }
}

//! `stockbook-ledger` — the append-only stock movement ledger.
//!
//! Movements are audit records: once recorded they are never updated or
//! deleted. A product's current stock is not stored anywhere; it is the
//! signed sum of its movements, computed by [`stock::derived_stock`].

pub mod movement;
pub mod stock;

pub use movement::{Movement, MovementType, NewMovement};
pub use stock::derived_stock;

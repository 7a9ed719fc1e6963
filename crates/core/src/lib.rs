//! `stockbook-core` — shared domain foundation.
//!
//! This crate contains **pure domain** primitives (no storage or HTTP concerns).

pub mod email;
pub mod error;
pub mod id;

pub use email::EmailAddress;
pub use error::{Error, Result};
pub use id::{CategoryId, MovementId, ProductId, RequestId, SupplierId, WarehouseId};

//! Request DTOs and response shapes that exist only on the wire.
//!
//! Most responses serialize domain types directly; only shapes that combine
//! several domain values live here. Input structs reject unknown fields so a
//! misspelled key fails loudly instead of being silently dropped.

use serde::{Deserialize, Serialize};

use stockbook_core::EmailAddress;
use stockbook_ledger::Movement;
use stockbook_procurement::RequestStatus;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: EmailAddress,
    pub credential: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionRequest {
    pub status: RequestStatus,
    pub caller_email: EmailAddress,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// A recorded movement together with the product's resulting stock.
#[derive(Debug, Serialize)]
pub struct MovementRecorded {
    #[serde(flatten)]
    pub movement: Movement,
    pub stock: i64,
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub product_id: stockbook_core::ProductId,
    pub stock: i64,
}

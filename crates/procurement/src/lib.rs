//! `stockbook-procurement` — the purchase-request workflow.
//!
//! A request is created with all of its line items in one atomic operation
//! and then only ever changes status (plus the approver/receiver fields a
//! transition sets). The transition table in [`transition`] is the single
//! authority on which status changes exist and who may perform them.

pub mod request;
pub mod transition;

pub use request::{NewRequest, NewRequestItem, PurchaseRequest, RequestItem};
pub use transition::{RequestStatus, TransitionEffect, TransitionGate, plan_transition, transition_gate};

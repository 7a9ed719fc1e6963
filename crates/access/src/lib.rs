//! `stockbook-access` — authorization boundary for the ledger and workflow.
//!
//! This crate is intentionally decoupled from HTTP and storage: it defines
//! the role model, the predicates that gate workflow transitions and
//! movement creation, and the one-way credential digest used by login.

pub mod digest;
pub mod gate;
pub mod role;

pub use digest::{hash_credential, verify_credential};
pub use gate::{Actor, can_approve, can_archive, can_receive};
pub use role::Role;

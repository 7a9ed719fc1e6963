//! Authorization predicates.
//!
//! The workflow and ledger layers consult these predicates; they never
//! inspect roles directly. `can_receive` is deliberately flag-based: a role
//! is not itself sufficient to be the receiving party of a purchase request.

use crate::role::Role;

/// An authenticated caller as seen by the authorization predicates.
///
/// Implemented by the catalog's user record; kept as a trait so the
/// predicates stay decoupled from storage shapes.
pub trait Actor {
    fn role(&self) -> Role;

    /// Whether this actor is eligible to be the receiving party of a
    /// purchase request. Independent of role.
    fn can_receive_orders(&self) -> bool;
}

/// Approve or reject a pending request, or mark an approved one as sent.
pub fn can_approve(actor: &impl Actor) -> bool {
    matches!(actor.role(), Role::Administrator | Role::Manager)
}

/// Be the receiving party of a sent request. Flag only; role is irrelevant.
pub fn can_receive(actor: &impl Actor) -> bool {
    actor.can_receive_orders()
}

/// Archive a request in any archivable state.
pub fn can_archive(actor: &impl Actor) -> bool {
    actor.role() == Role::Administrator
}

//! The purchase-request state machine.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockbook_access::{Actor, can_approve, can_archive, can_receive};
use stockbook_core::{Error, Result};

/// Purchase request lifecycle status.
///
/// `Archived` is fully terminal. `Rejected` is terminal except that an
/// administrator may still archive it (the transition table is authoritative
/// here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Sent,
    Received,
    Archived,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Sent,
        RequestStatus::Received,
        RequestStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Sent => "sent",
            RequestStatus::Received => "received",
            RequestStatus::Archived => "archived",
        }
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "sent" => Ok(RequestStatus::Sent),
            "received" => Ok(RequestStatus::Received),
            "archived" => Ok(RequestStatus::Archived),
            other => Err(Error::validation(format!("unknown status {other:?}"))),
        }
    }
}

/// Who may perform a given transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionGate {
    /// Administrator or Manager.
    Approval,
    /// Receive-eligibility flag, independent of role.
    Receiving,
    /// Administrator only.
    Archival,
}

impl TransitionGate {
    pub fn permits(&self, actor: &impl Actor) -> bool {
        match self {
            TransitionGate::Approval => can_approve(actor),
            TransitionGate::Receiving => can_receive(actor),
            TransitionGate::Archival => can_archive(actor),
        }
    }
}

/// The transition table. `None` means the pair does not exist; any attempt
/// at it fails with `InvalidTransition` regardless of caller.
pub fn transition_gate(from: RequestStatus, to: RequestStatus) -> Option<TransitionGate> {
    use RequestStatus::*;
    match (from, to) {
        (Pending, Approved) => Some(TransitionGate::Approval),
        (Pending, Rejected) => Some(TransitionGate::Approval),
        (Approved, Sent) => Some(TransitionGate::Approval),
        (Sent, Received) => Some(TransitionGate::Receiving),
        (Approved | Sent | Received | Rejected, Archived) => Some(TransitionGate::Archival),
        _ => None,
    }
}

/// Fields a successful transition writes in addition to the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionEffect {
    /// Record the caller as approver and stamp the approval time.
    pub set_approver: bool,
    /// Record the caller as receiver and stamp the receipt time.
    pub set_receiver: bool,
}

/// Validate a transition against the table and the caller's authorization.
///
/// Ordering matters: a nonexistent pair is `InvalidTransition` even for an
/// administrator; an existing pair with a failing gate is `Unauthorized`.
pub fn plan_transition(
    from: RequestStatus,
    to: RequestStatus,
    caller: &impl Actor,
) -> Result<TransitionEffect> {
    let gate = transition_gate(from, to)
        .ok_or_else(|| Error::invalid_transition(format!("cannot move request from {from} to {to}")))?;

    if !gate.permits(caller) {
        return Err(Error::unauthorized(format!(
            "caller is not permitted to move request from {from} to {to}"
        )));
    }

    Ok(TransitionEffect {
        set_approver: matches!((from, to), (RequestStatus::Pending, RequestStatus::Approved)),
        set_receiver: matches!((from, to), (RequestStatus::Sent, RequestStatus::Received)),
    })
}

#[cfg(test)]
mod tests {
    use stockbook_access::Role;

    use super::*;

    struct TestActor {
        role: Role,
        receive: bool,
    }

    impl Actor for TestActor {
        fn role(&self) -> Role {
            self.role
        }

        fn can_receive_orders(&self) -> bool {
            self.receive
        }
    }

    fn admin() -> TestActor {
        TestActor {
            role: Role::Administrator,
            receive: false,
        }
    }

    fn manager() -> TestActor {
        TestActor {
            role: Role::Manager,
            receive: false,
        }
    }

    fn staff() -> TestActor {
        TestActor {
            role: Role::Staff,
            receive: false,
        }
    }

    fn receiver() -> TestActor {
        TestActor {
            role: Role::Staff,
            receive: true,
        }
    }

    const TABLE: [(RequestStatus, RequestStatus); 8] = [
        (RequestStatus::Pending, RequestStatus::Approved),
        (RequestStatus::Pending, RequestStatus::Rejected),
        (RequestStatus::Approved, RequestStatus::Sent),
        (RequestStatus::Sent, RequestStatus::Received),
        (RequestStatus::Approved, RequestStatus::Archived),
        (RequestStatus::Sent, RequestStatus::Archived),
        (RequestStatus::Received, RequestStatus::Archived),
        (RequestStatus::Rejected, RequestStatus::Archived),
    ];

    #[test]
    fn every_pair_outside_the_table_is_invalid_for_everyone() {
        // Exhaustive over all 36 (from, to) pairs: a pair not listed in the
        // table fails with InvalidTransition no matter how privileged the
        // caller is.
        let superuser = TestActor {
            role: Role::Administrator,
            receive: true,
        };
        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                let in_table = TABLE.contains(&(from, to));
                let result = plan_transition(from, to, &superuser);
                if in_table {
                    assert!(result.is_ok(), "{from} -> {to} should be allowed");
                } else {
                    assert!(
                        matches!(result, Err(Error::InvalidTransition(_))),
                        "{from} -> {to} should be InvalidTransition"
                    );
                }
            }
        }
    }

    #[test]
    fn nothing_leaves_archived() {
        for to in RequestStatus::ALL {
            assert!(transition_gate(RequestStatus::Archived, to).is_none());
        }
    }

    #[test]
    fn staff_cannot_approve() {
        let err = plan_transition(RequestStatus::Pending, RequestStatus::Approved, &staff())
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn manager_approval_sets_approver() {
        let effect =
            plan_transition(RequestStatus::Pending, RequestStatus::Approved, &manager()).unwrap();
        assert!(effect.set_approver);
        assert!(!effect.set_receiver);
    }

    #[test]
    fn rejection_has_no_side_effects() {
        let effect =
            plan_transition(RequestStatus::Pending, RequestStatus::Rejected, &admin()).unwrap();
        assert_eq!(effect, TransitionEffect::default());
    }

    #[test]
    fn receiving_requires_the_flag_even_for_administrators() {
        let err = plan_transition(RequestStatus::Sent, RequestStatus::Received, &admin())
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        let effect =
            plan_transition(RequestStatus::Sent, RequestStatus::Received, &receiver()).unwrap();
        assert!(effect.set_receiver);
    }

    #[test]
    fn archival_is_role_only() {
        // The receive flag grants nothing here; administrator role does.
        let err = plan_transition(RequestStatus::Received, RequestStatus::Archived, &receiver())
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        assert!(plan_transition(RequestStatus::Received, RequestStatus::Archived, &admin()).is_ok());
        assert!(
            plan_transition(RequestStatus::Received, RequestStatus::Archived, &manager()).is_err()
        );
    }

    #[test]
    fn rejected_can_only_be_archived() {
        for to in RequestStatus::ALL {
            let gate = transition_gate(RequestStatus::Rejected, to);
            if to == RequestStatus::Archived {
                assert_eq!(gate, Some(TransitionGate::Archival));
            } else {
                assert!(gate.is_none());
            }
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_access::Actor;
use stockbook_core::{EmailAddress, Error, ProductId, RequestId, Result};

use crate::transition::{RequestStatus, TransitionEffect, plan_transition};

/// A line item, fixed at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit: String,
}

/// Purchase request header.
///
/// Items live alongside it in insertion order; after creation only the
/// status and the transition-written fields (approver/receiver and their
/// timestamps) ever change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: RequestId,
    pub status: RequestStatus,
    pub notes: String,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
    pub requester: EmailAddress,
    pub approver: Option<EmailAddress>,
    pub receiver: Option<EmailAddress>,
}

impl PurchaseRequest {
    /// Validate a transition for `caller` and apply it in memory.
    ///
    /// The store persists the resulting fields under an optimistic status
    /// guard; this method contains all of the domain logic.
    pub fn transition(
        &mut self,
        target: RequestStatus,
        caller: &impl Actor,
        caller_email: &EmailAddress,
        now: DateTime<Utc>,
    ) -> Result<TransitionEffect> {
        let effect = plan_transition(self.status, target, caller)?;

        self.status = target;
        if effect.set_approver {
            self.approver = Some(caller_email.clone());
            self.approved_at = Some(now);
        }
        if effect.set_receiver {
            self.receiver = Some(caller_email.clone());
            self.received_at = Some(now);
        }
        Ok(effect)
    }
}

/// Input for one line of a new request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRequestItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit: String,
}

/// Input for creating a request. Header and items are committed together or
/// not at all; a failure on any line leaves zero rows behind.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRequest {
    pub requester_email: EmailAddress,
    pub items: Vec<NewRequestItem>,
    #[serde(default)]
    pub notes: String,
}

impl NewRequest {
    /// Validate shape and produce the header plus its ordered items.
    ///
    /// Product existence is checked by the store inside the same
    /// transaction that inserts the rows.
    pub fn build(self, now: DateTime<Utc>) -> Result<(PurchaseRequest, Vec<RequestItem>)> {
        if self.items.is_empty() {
            return Err(Error::validation(
                "a purchase request must have at least one item",
            ));
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.into_iter().enumerate() {
            if item.quantity <= 0 {
                return Err(Error::validation(format!(
                    "item {index}: quantity must be a positive integer (got {})",
                    item.quantity
                )));
            }
            let unit = item.unit.trim().to_string();
            if unit.is_empty() {
                return Err(Error::validation(format!("item {index}: unit cannot be empty")));
            }
            items.push(RequestItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit,
            });
        }

        let request = PurchaseRequest {
            id: RequestId::new(),
            status: RequestStatus::Pending,
            notes: self.notes,
            requested_at: now,
            approved_at: None,
            received_at: None,
            requester: self.requester_email,
            approver: None,
            receiver: None,
        };

        Ok((request, items))
    }
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

    fn email(s: &str) -> EmailAddress {
        EmailAddress::parse(s).unwrap()
    }

    fn new_request(items: Vec<NewRequestItem>) -> NewRequest {
        NewRequest {
            requester_email: email("alice@x.com"),
            items,
            notes: String::new(),
        }
    }

    fn one_item() -> Vec<NewRequestItem> {
        vec![NewRequestItem {
            product_id: ProductId::new(),
            quantity: 2,
            unit: "unit".to_string(),
        }]
    }

    #[test]
    fn creation_starts_pending_with_request_timestamp() {
        let now = Utc::now();
        let (request, items) = new_request(one_item()).build(now).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.requested_at, now);
        assert_eq!(request.requester.as_str(), "alice@x.com");
        assert_eq!(request.approver, None);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn empty_items_fail_validation() {
        let err = new_request(Vec::new()).build(Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn one_bad_item_fails_the_whole_request() {
        let mut items = one_item();
        items.push(NewRequestItem {
            product_id: ProductId::new(),
            quantity: 0,
            unit: "unit".to_string(),
        });
        items.push(NewRequestItem {
            product_id: ProductId::new(),
            quantity: 5,
            unit: "unit".to_string(),
        });
        let err = new_request(items).build(Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn blank_unit_is_rejected() {
        let items = vec![NewRequestItem {
            product_id: ProductId::new(),
            quantity: 1,
            unit: "  ".to_string(),
        }];
        assert!(new_request(items).build(Utc::now()).is_err());
    }

    #[test]
    fn full_lifecycle_records_actors_and_timestamps() {
        let (mut request, _) = new_request(one_item()).build(Utc::now()).unwrap();

        let manager = TestActor {
            role: Role::Manager,
            receive: false,
        };
        let now = Utc::now();
        request
            .transition(RequestStatus::Approved, &manager, &email("bob@x.com"), now)
            .unwrap();
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(request.approver, Some(email("bob@x.com")));
        assert_eq!(request.approved_at, Some(now));

        request
            .transition(RequestStatus::Sent, &manager, &email("bob@x.com"), Utc::now())
            .unwrap();

        let carol = TestActor {
            role: Role::Staff,
            receive: true,
        };
        let received_at = Utc::now();
        request
            .transition(
                RequestStatus::Received,
                &carol,
                &email("carol@x.com"),
                received_at,
            )
            .unwrap();
        assert_eq!(request.receiver, Some(email("carol@x.com")));
        assert_eq!(request.received_at, Some(received_at));

        let admin = TestActor {
            role: Role::Administrator,
            receive: false,
        };
        request
            .transition(RequestStatus::Archived, &admin, &email("root@x.com"), Utc::now())
            .unwrap();
        assert_eq!(request.status, RequestStatus::Archived);

        // Archived is terminal for everyone.
        let err = request
            .transition(RequestStatus::Pending, &admin, &email("root@x.com"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
    }

    #[test]
    fn failed_transition_leaves_request_unchanged() {
        let (mut request, _) = new_request(one_item()).build(Utc::now()).unwrap();
        let staff = TestActor {
            role: Role::Staff,
            receive: false,
        };
        let before = request.clone();
        let err = request
            .transition(RequestStatus::Approved, &staff, &email("eve@x.com"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        assert_eq!(request, before);
    }
}

//! The operations behind the HTTP routes.
//!
//! Handlers stay thin: each one deserializes a DTO, calls one method here
//! and maps the result to a response. Everything involving more than one
//! store call, or any authorization decision, lives in this module.

use chrono::Utc;
use tracing::instrument;

use stockbook_catalog::PublicUser;
use stockbook_core::{EmailAddress, Error, ProductId, RequestId, Result};
use stockbook_ledger::{Movement, NewMovement};
use stockbook_procurement::{NewRequest, RequestStatus};
use stockbook_store::{RequestDetail, Snapshot, Store};

pub struct AppServices {
    store: Store,
}

impl AppServices {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Direct store access for the plain catalog CRUD routes.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Check a credential against the stored digest.
    ///
    /// Unknown user and wrong credential produce the same error, so the
    /// endpoint cannot be used to enumerate accounts.
    #[instrument(skip(self, credential), fields(email = %email))]
    pub async fn login(&self, email: &EmailAddress, credential: &str) -> Result<PublicUser> {
        if credential.is_empty() {
            return Err(Error::validation("credential cannot be empty"));
        }
        let user = self
            .store
            .get_user(email)
            .await
            .map_err(|_| Error::unauthorized("invalid email or credential"))?;
        if !stockbook_access::verify_credential(&user.credential_hash, credential)? {
            return Err(Error::unauthorized("invalid email or credential"));
        }
        Ok(user.public())
    }

    /// Record a movement and return it with the product's new stock.
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn record_movement(&self, input: NewMovement) -> Result<(Movement, i64)> {
        let movement = input.build(Utc::now())?;
        self.store.get_product(movement.product_id).await?;
        if let Some(email) = &movement.acting_user {
            self.store.get_user(email).await?;
        }
        self.store.insert_movement(&movement).await?;
        let stock = self.store.current_stock(movement.product_id).await?;
        Ok((movement, stock))
    }

    /// Stock of one product; `NotFound` if the product does not exist.
    pub async fn current_stock(&self, product_id: ProductId) -> Result<i64> {
        self.store.get_product(product_id).await?;
        self.store.current_stock(product_id).await
    }

    pub async fn recent_movements(&self, limit: i64) -> Result<Vec<Movement>> {
        self.store.recent_movements(limit).await
    }

    /// Create a purchase request with all of its items.
    #[instrument(skip(self, input), fields(requester = %input.requester_email))]
    pub async fn create_request(&self, input: NewRequest) -> Result<RequestDetail> {
        self.store.get_user(&input.requester_email).await?;
        let (request, items) = input.build(Utc::now())?;
        self.store.create_request(&request, &items).await?;
        self.store.request_detail(request.id).await
    }

    /// Move a request to `target` on behalf of `caller_email`.
    ///
    /// The persisted UPDATE is guarded by the status validated here, so two
    /// racing callers cannot both transition from the same source state.
    #[instrument(skip(self), fields(request_id = %id, target = %target, caller = %caller_email))]
    pub async fn transition_request(
        &self,
        id: RequestId,
        target: RequestStatus,
        caller_email: &EmailAddress,
    ) -> Result<RequestDetail> {
        let caller = self
            .store
            .get_user(caller_email)
            .await
            .map_err(|_| Error::unauthorized(format!("unknown caller {caller_email}")))?;

        let mut request = self.store.get_request(id).await?;
        let prior = request.status;
        request.transition(target, &caller, caller_email, Utc::now())?;
        self.store.apply_transition(&request, prior).await?;

        tracing::info!(from = %prior, to = %target, "request transitioned");
        self.store.request_detail(id).await
    }

    pub async fn delete_request(&self, id: RequestId) -> Result<()> {
        self.store.delete_request(id).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.store.snapshot().await
    }
}

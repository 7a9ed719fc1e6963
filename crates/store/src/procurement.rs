//! Purchase-request persistence.
//!
//! Creation writes the header and every line item in one transaction: a
//! failing line rolls the whole request back, so partial requests never
//! exist. Transitions persist through an UPDATE guarded by the status the
//! writer validated against, which turns a lost race into a `Conflict`
//! instead of a double-apply.

use sqlx::sqlite::SqliteRow;
use tracing::instrument;

use stockbook_core::{Error, RequestId, Result};
use stockbook_procurement::{PurchaseRequest, RequestItem, RequestStatus};

use crate::{Store, column, map_sqlx_error, parsed_column, parsed_column_opt};

pub(crate) fn request_from_row(row: &SqliteRow) -> Result<PurchaseRequest> {
    Ok(PurchaseRequest {
        id: parsed_column(row, "id")?,
        status: parsed_column(row, "status")?,
        notes: column(row, "notes")?,
        requested_at: column(row, "requested_at")?,
        approved_at: column(row, "approved_at")?,
        received_at: column(row, "received_at")?,
        requester: parsed_column(row, "requester")?,
        approver: parsed_column_opt(row, "approver")?,
        receiver: parsed_column_opt(row, "receiver")?,
    })
}

fn item_from_row(row: &SqliteRow) -> Result<RequestItem> {
    Ok(RequestItem {
        product_id: parsed_column(row, "product_id")?,
        quantity: column(row, "quantity")?,
        unit: column(row, "unit")?,
    })
}

impl Store {
    /// Persist a request header and its items atomically.
    ///
    /// Each item's product is re-checked inside the transaction; an unknown
    /// product aborts the whole write with `NotFound` and zero rows remain.
    #[instrument(skip(self, request, items), fields(request_id = %request.id, items = items.len()))]
    pub async fn create_request(
        &self,
        request: &PurchaseRequest,
        items: &[RequestItem],
    ) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_sqlx_error("create_request", e))?;

        for item in items {
            let exists = sqlx::query("SELECT 1 FROM products WHERE id = ?")
                .bind(item.product_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("create_request", e))?;
            if exists.is_none() {
                // Dropping the transaction rolls everything back.
                return Err(Error::not_found(format!("product {}", item.product_id)));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO purchase_requests
                (id, status, notes, requested_at, approved_at, received_at,
                 requester, approver, receiver)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.id.to_string())
        .bind(request.status.as_str())
        .bind(&request.notes)
        .bind(request.requested_at)
        .bind(request.approved_at)
        .bind(request.received_at)
        .bind(request.requester.as_str())
        .bind(request.approver.as_ref().map(|e| e.as_str().to_string()))
        .bind(request.receiver.as_ref().map(|e| e.as_str().to_string()))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_request", e))?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO purchase_request_items
                    (request_id, position, product_id, quantity, unit)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(request.id.to_string())
            .bind(position as i64)
            .bind(item.product_id.to_string())
            .bind(item.quantity)
            .bind(&item.unit)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create_request", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("create_request", e))?;
        Ok(())
    }

    pub async fn get_request(&self, id: RequestId) -> Result<PurchaseRequest> {
        let row = sqlx::query("SELECT * FROM purchase_requests WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_sqlx_error("get_request", e))?
            .ok_or_else(|| Error::not_found(format!("purchase request {id}")))?;
        request_from_row(&row)
    }

    /// Headers of all requests, most recently requested first.
    pub async fn list_requests(&self) -> Result<Vec<PurchaseRequest>> {
        let rows =
            sqlx::query("SELECT * FROM purchase_requests ORDER BY requested_at DESC, rowid DESC")
                .fetch_all(self.pool())
                .await
                .map_err(|e| map_sqlx_error("list_requests", e))?;
        rows.iter().map(request_from_row).collect()
    }

    /// Items of one request in insertion order.
    pub async fn get_request_items(&self, id: RequestId) -> Result<Vec<RequestItem>> {
        let rows = sqlx::query(
            "SELECT * FROM purchase_request_items WHERE request_id = ? ORDER BY position ASC",
        )
        .bind(id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_sqlx_error("get_request_items", e))?;
        rows.iter().map(item_from_row).collect()
    }

    /// Persist an already-validated transition.
    ///
    /// `prior` is the status the caller read and validated against; the
    /// UPDATE only applies while the row still carries it. A zero-row
    /// update means another writer got there first.
    #[instrument(skip(self, request), fields(request_id = %request.id, from = %prior, to = %request.status))]
    pub async fn apply_transition(
        &self,
        request: &PurchaseRequest,
        prior: RequestStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE purchase_requests
            SET status = ?, approved_at = ?, received_at = ?, approver = ?, receiver = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(request.status.as_str())
        .bind(request.approved_at)
        .bind(request.received_at)
        .bind(request.approver.as_ref().map(|e| e.as_str().to_string()))
        .bind(request.receiver.as_ref().map(|e| e.as_str().to_string()))
        .bind(request.id.to_string())
        .bind(prior.as_str())
        .execute(self.pool())
        .await
        .map_err(|e| map_sqlx_error("apply_transition", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::conflict(format!(
                "purchase request {} changed status concurrently (expected {prior})",
                request.id
            )));
        }
        Ok(())
    }

    /// Delete a request and (by cascade) its items.
    #[instrument(skip(self), fields(request_id = %id))]
    pub async fn delete_request(&self, id: RequestId) -> Result<()> {
        let result = sqlx::query("DELETE FROM purchase_requests WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("delete_request", e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("purchase request {id}")));
        }
        Ok(())
    }
}

//! Movement persistence and stock queries.
//!
//! The movements table is append-only: there is no update or delete path
//! here, only inserts and reads. Aggregation goes through
//! [`stockbook_ledger::derived_stock`] so the stock law has exactly one
//! implementation.

use sqlx::sqlite::SqliteRow;
use tracing::instrument;

use stockbook_core::{ProductId, Result};
use stockbook_ledger::{Movement, derived_stock};

use crate::{Store, column, map_sqlx_error, parsed_column, parsed_column_opt};

pub(crate) fn movement_from_row(row: &SqliteRow) -> Result<Movement> {
    Ok(Movement {
        id: parsed_column(row, "id")?,
        product_id: parsed_column(row, "product_id")?,
        movement_type: parsed_column(row, "movement_type")?,
        quantity: column(row, "quantity")?,
        acting_user: parsed_column_opt(row, "acting_user")?,
        occurred_at: column(row, "occurred_at")?,
    })
}

impl Store {
    /// Append a movement. The row is immutable from here on.
    #[instrument(skip(self, movement), fields(movement_id = %movement.id, product_id = %movement.product_id))]
    pub async fn insert_movement(&self, movement: &Movement) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO movements
                (id, product_id, movement_type, quantity, acting_user, occurred_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(movement.id.to_string())
        .bind(movement.product_id.to_string())
        .bind(movement.movement_type.as_str())
        .bind(movement.quantity)
        .bind(movement.acting_user.as_ref().map(|e| e.as_str().to_string()))
        .bind(movement.occurred_at)
        .execute(self.pool())
        .await
        .map_err(|e| map_sqlx_error("insert_movement", e))?;
        Ok(())
    }

    /// All movements of one product, oldest first.
    pub async fn movements_for_product(&self, product_id: ProductId) -> Result<Vec<Movement>> {
        let rows = sqlx::query(
            "SELECT * FROM movements WHERE product_id = ? ORDER BY occurred_at ASC, rowid ASC",
        )
        .bind(product_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_sqlx_error("movements_for_product", e))?;
        rows.iter().map(movement_from_row).collect()
    }

    /// Signed aggregate of a product's ledger. The product's existence is
    /// the caller's concern; an unknown id aggregates to zero here.
    pub async fn current_stock(&self, product_id: ProductId) -> Result<i64> {
        let movements = self.movements_for_product(product_id).await?;
        Ok(derived_stock(&movements))
    }

    /// The most recent movements across all products, newest first, ties
    /// broken by insertion order.
    pub async fn recent_movements(&self, limit: i64) -> Result<Vec<Movement>> {
        let rows = sqlx::query(
            "SELECT * FROM movements ORDER BY occurred_at DESC, rowid DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_sqlx_error("recent_movements", e))?;
        rows.iter().map(movement_from_row).collect()
    }
}

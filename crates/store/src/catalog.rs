//! Catalog persistence: users, products, categories, suppliers, warehouses.

use sqlx::sqlite::SqliteRow;
use tracing::instrument;

use stockbook_catalog::{
    Category, CategoryUpdate, Product, ProductUpdate, Supplier, SupplierUpdate, User, UserUpdate,
    Warehouse, WarehouseUpdate,
};
use stockbook_core::{
    CategoryId, EmailAddress, Error, ProductId, Result, SupplierId, WarehouseId,
};

use crate::{Store, column, map_sqlx_error, parsed_column, parsed_column_opt};

pub(crate) fn user_from_row(row: &SqliteRow) -> Result<User> {
    let category_ids: String = column(row, "category_ids")?;
    let category_ids: Vec<CategoryId> = serde_json::from_str(&category_ids)
        .map_err(|e| Error::internal(format!("column category_ids: {e}")))?;
    Ok(User {
        email: parsed_column(row, "email")?,
        display_name: column(row, "display_name")?,
        role: parsed_column(row, "role")?,
        credential_hash: column(row, "credential_hash")?,
        home_area: column(row, "home_area")?,
        category_ids,
        can_receive_orders: column(row, "can_receive_orders")?,
    })
}

pub(crate) fn product_from_row(row: &SqliteRow) -> Result<Product> {
    Ok(Product {
        id: parsed_column(row, "id")?,
        name: column(row, "name")?,
        unit: column(row, "unit")?,
        min_stock: column(row, "min_stock")?,
        barcode: column(row, "barcode")?,
        supplier_id: parsed_column_opt(row, "supplier_id")?,
        category_id: parsed_column_opt(row, "category_id")?,
        warehouse_id: parsed_column_opt(row, "warehouse_id")?,
    })
}

fn category_from_row(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        id: parsed_column(row, "id")?,
        name: column(row, "name")?,
    })
}

fn supplier_from_row(row: &SqliteRow) -> Result<Supplier> {
    Ok(Supplier {
        id: parsed_column(row, "id")?,
        name: column(row, "name")?,
        contact: column(row, "contact")?,
    })
}

fn warehouse_from_row(row: &SqliteRow) -> Result<Warehouse> {
    Ok(Warehouse {
        id: parsed_column(row, "id")?,
        name: column(row, "name")?,
        location: column(row, "location")?,
    })
}

impl Store {
    // ── users ────────────────────────────────────────────────────────────

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn insert_user(&self, user: &User) -> Result<()> {
        let category_ids = serde_json::to_string(&user.category_ids)
            .map_err(|e| Error::internal(format!("serialize category_ids: {e}")))?;
        sqlx::query(
            r#"
            INSERT INTO users
                (email, display_name, role, credential_hash, home_area,
                 category_ids, can_receive_orders)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(&user.credential_hash)
        .bind(&user.home_area)
        .bind(category_ids)
        .bind(user.can_receive_orders)
        .execute(self.pool())
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    pub async fn get_user(&self, email: &EmailAddress) -> Result<User> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?
            .ok_or_else(|| Error::not_found(format!("user {email}")))?;
        user_from_row(&row)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY email")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;
        rows.iter().map(user_from_row).collect()
    }

    #[instrument(skip(self, update), fields(email = %email))]
    pub async fn update_user(&self, email: &EmailAddress, update: UserUpdate) -> Result<User> {
        let mut user = self.get_user(email).await?;
        update.apply(&mut user)?;
        let category_ids = serde_json::to_string(&user.category_ids)
            .map_err(|e| Error::internal(format!("serialize category_ids: {e}")))?;
        sqlx::query(
            r#"
            UPDATE users
            SET display_name = ?, role = ?, credential_hash = ?, home_area = ?,
                category_ids = ?, can_receive_orders = ?
            WHERE email = ?
            "#,
        )
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(&user.credential_hash)
        .bind(&user.home_area)
        .bind(category_ids)
        .bind(user.can_receive_orders)
        .bind(user.email.as_str())
        .execute(self.pool())
        .await
        .map_err(|e| map_sqlx_error("update_user", e))?;
        Ok(user)
    }

    #[instrument(skip(self), fields(email = %email))]
    pub async fn delete_user(&self, email: &EmailAddress) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email.as_str())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("user {email}")));
        }
        Ok(())
    }

    // ── products ─────────────────────────────────────────────────────────

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn insert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, unit, min_stock, barcode, supplier_id, category_id, warehouse_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(&product.unit)
        .bind(product.min_stock)
        .bind(&product.barcode)
        .bind(product.supplier_id.map(|id| id.to_string()))
        .bind(product.category_id.map(|id| id.to_string()))
        .bind(product.warehouse_id.map(|id| id.to_string()))
        .execute(self.pool())
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;
        Ok(())
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_sqlx_error("get_product", e))?
            .ok_or_else(|| Error::not_found(format!("product {id}")))?;
        product_from_row(&row)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        let mut product = self.get_product(id).await?;
        update.apply(&mut product)?;
        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, unit = ?, min_stock = ?, barcode = ?,
                supplier_id = ?, category_id = ?, warehouse_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.unit)
        .bind(product.min_stock)
        .bind(&product.barcode)
        .bind(product.supplier_id.map(|id| id.to_string()))
        .bind(product.category_id.map(|id| id.to_string()))
        .bind(product.warehouse_id.map(|id| id.to_string()))
        .bind(product.id.to_string())
        .execute(self.pool())
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;
        Ok(product)
    }

    /// Delete a product. Its movements and purchase-request line items go
    /// with it (cascade).
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("product {id}")));
        }
        Ok(())
    }

    // ── categories ───────────────────────────────────────────────────────

    pub async fn insert_category(&self, category: &Category) -> Result<()> {
        sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
            .bind(category.id.to_string())
            .bind(&category.name)
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("insert_category", e))?;
        Ok(())
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Category> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_sqlx_error("get_category", e))?
            .ok_or_else(|| Error::not_found(format!("category {id}")))?;
        category_from_row(&row)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_sqlx_error("list_categories", e))?;
        rows.iter().map(category_from_row).collect()
    }

    pub async fn update_category(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category> {
        let mut category = self.get_category(id).await?;
        update.apply(&mut category)?;
        sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(&category.name)
            .bind(category.id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("update_category", e))?;
        Ok(category)
    }

    /// Delete a category. Products referencing it keep existing with the
    /// reference nulled.
    pub async fn delete_category(&self, id: CategoryId) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("delete_category", e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("category {id}")));
        }
        Ok(())
    }

    // ── suppliers ────────────────────────────────────────────────────────

    pub async fn insert_supplier(&self, supplier: &Supplier) -> Result<()> {
        sqlx::query("INSERT INTO suppliers (id, name, contact) VALUES (?, ?, ?)")
            .bind(supplier.id.to_string())
            .bind(&supplier.name)
            .bind(&supplier.contact)
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("insert_supplier", e))?;
        Ok(())
    }

    pub async fn get_supplier(&self, id: SupplierId) -> Result<Supplier> {
        let row = sqlx::query("SELECT * FROM suppliers WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_sqlx_error("get_supplier", e))?
            .ok_or_else(|| Error::not_found(format!("supplier {id}")))?;
        supplier_from_row(&row)
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        let rows = sqlx::query("SELECT * FROM suppliers ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_sqlx_error("list_suppliers", e))?;
        rows.iter().map(supplier_from_row).collect()
    }

    pub async fn update_supplier(&self, id: SupplierId, update: SupplierUpdate) -> Result<Supplier> {
        let mut supplier = self.get_supplier(id).await?;
        update.apply(&mut supplier)?;
        sqlx::query("UPDATE suppliers SET name = ?, contact = ? WHERE id = ?")
            .bind(&supplier.name)
            .bind(&supplier.contact)
            .bind(supplier.id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("update_supplier", e))?;
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: SupplierId) -> Result<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("delete_supplier", e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("supplier {id}")));
        }
        Ok(())
    }

    // ── warehouses ───────────────────────────────────────────────────────

    pub async fn insert_warehouse(&self, warehouse: &Warehouse) -> Result<()> {
        sqlx::query("INSERT INTO warehouses (id, name, location) VALUES (?, ?, ?)")
            .bind(warehouse.id.to_string())
            .bind(&warehouse.name)
            .bind(&warehouse.location)
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("insert_warehouse", e))?;
        Ok(())
    }

    pub async fn get_warehouse(&self, id: WarehouseId) -> Result<Warehouse> {
        let row = sqlx::query("SELECT * FROM warehouses WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_sqlx_error("get_warehouse", e))?
            .ok_or_else(|| Error::not_found(format!("warehouse {id}")))?;
        warehouse_from_row(&row)
    }

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>> {
        let rows = sqlx::query("SELECT * FROM warehouses ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_sqlx_error("list_warehouses", e))?;
        rows.iter().map(warehouse_from_row).collect()
    }

    pub async fn update_warehouse(
        &self,
        id: WarehouseId,
        update: WarehouseUpdate,
    ) -> Result<Warehouse> {
        let mut warehouse = self.get_warehouse(id).await?;
        update.apply(&mut warehouse)?;
        sqlx::query("UPDATE warehouses SET name = ?, location = ? WHERE id = ?")
            .bind(&warehouse.name)
            .bind(&warehouse.location)
            .bind(warehouse.id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("update_warehouse", e))?;
        Ok(warehouse)
    }

    pub async fn delete_warehouse(&self, id: WarehouseId) -> Result<()> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| map_sqlx_error("delete_warehouse", e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("warehouse {id}")));
        }
        Ok(())
    }
}

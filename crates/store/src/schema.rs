//! Schema bootstrap.
//!
//! Cascade policy is explicit per relationship:
//! - deleting a category/supplier/warehouse nulls the reference on products;
//! - deleting a product cascades to its movements and request line items;
//! - deleting a user nulls the actor on movements; request actor emails are
//!   recorded history and stay as written.

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id   TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS suppliers (
        id      TEXT PRIMARY KEY,
        name    TEXT NOT NULL UNIQUE,
        contact TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS warehouses (
        id       TEXT PRIMARY KEY,
        name     TEXT NOT NULL UNIQUE,
        location TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        email              TEXT PRIMARY KEY,
        display_name       TEXT NOT NULL,
        role               TEXT NOT NULL,
        credential_hash    TEXT NOT NULL,
        home_area          TEXT,
        category_ids       TEXT NOT NULL DEFAULT '[]',
        can_receive_orders INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id           TEXT PRIMARY KEY,
        name         TEXT NOT NULL UNIQUE,
        unit         TEXT NOT NULL,
        min_stock    INTEGER NOT NULL DEFAULT 0,
        barcode      TEXT UNIQUE,
        supplier_id  TEXT REFERENCES suppliers(id)  ON DELETE SET NULL,
        category_id  TEXT REFERENCES categories(id) ON DELETE SET NULL,
        warehouse_id TEXT REFERENCES warehouses(id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movements (
        id            TEXT PRIMARY KEY,
        product_id    TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        movement_type TEXT NOT NULL,
        quantity      INTEGER NOT NULL CHECK (quantity > 0),
        acting_user   TEXT REFERENCES users(email) ON DELETE SET NULL,
        occurred_at   TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_movements_product ON movements(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_movements_occurred ON movements(occurred_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS purchase_requests (
        id           TEXT PRIMARY KEY,
        status       TEXT NOT NULL,
        notes        TEXT NOT NULL DEFAULT '',
        requested_at TEXT NOT NULL,
        approved_at  TEXT,
        received_at  TEXT,
        requester    TEXT NOT NULL,
        approver     TEXT,
        receiver     TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS purchase_request_items (
        request_id TEXT NOT NULL REFERENCES purchase_requests(id) ON DELETE CASCADE,
        position   INTEGER NOT NULL,
        product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        quantity   INTEGER NOT NULL CHECK (quantity > 0),
        unit       TEXT NOT NULL,
        PRIMARY KEY (request_id, position)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_request_items_product ON purchase_request_items(product_id)",
];

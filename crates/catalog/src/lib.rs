//! `stockbook-catalog` — reference entities and their input validation.
//!
//! The catalog holds plain attribute records (products, categories,
//! suppliers, warehouses, users) with no derived state. Input structs here
//! enumerate exactly the fields a caller may set; unknown fields are
//! rejected rather than merged.

pub mod product;
pub mod reference;
pub mod serde_util;
pub mod user;

pub use product::{NewProduct, Product, ProductUpdate};
pub use reference::{
    Category, CategoryUpdate, NewCategory, NewSupplier, NewWarehouse, Supplier, SupplierUpdate,
    Warehouse, WarehouseUpdate,
};
pub use user::{NewUser, PublicUser, User, UserUpdate};

//! Thin reference entities: categories, suppliers, warehouses.
//!
//! Names are unique per collection; deleting one of these nulls the
//! reference on dependent products rather than deleting the product.

use serde::{Deserialize, Serialize};

use stockbook_core::{CategoryId, Error, Result, SupplierId, WarehouseId};

use crate::serde_util::double_option;

fn required_name(raw: String, what: &str) -> Result<String> {
    let name = raw.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation(format!("{what} name cannot be empty")));
    }
    Ok(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn build(self) -> Result<Category> {
        Ok(Category {
            id: CategoryId::new(),
            name: required_name(self.name, "category")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryUpdate {
    pub fn apply(self, category: &mut Category) -> Result<()> {
        if let Some(name) = self.name {
            category.name = required_name(name, "category")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
}

impl NewSupplier {
    pub fn build(self) -> Result<Supplier> {
        Ok(Supplier {
            id: SupplierId::new(),
            name: required_name(self.name, "supplier")?,
            contact: self.contact,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact: Option<Option<String>>,
}

impl SupplierUpdate {
    pub fn apply(self, supplier: &mut Supplier) -> Result<()> {
        if let Some(name) = self.name {
            supplier.name = required_name(name, "supplier")?;
        }
        if let Some(contact) = self.contact {
            supplier.contact = contact;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewWarehouse {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewWarehouse {
    pub fn build(self) -> Result<Warehouse> {
        Ok(Warehouse {
            id: WarehouseId::new(),
            name: required_name(self.name, "warehouse")?,
            location: self.location,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
}

impl WarehouseUpdate {
    pub fn apply(self, warehouse: &mut Warehouse) -> Result<()> {
        if let Some(name) = self.name {
            warehouse.name = required_name(name, "warehouse")?;
        }
        if let Some(location) = self.location {
            warehouse.location = location;
        }
        Ok(())
    }
}

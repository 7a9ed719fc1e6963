use serde::{Deserialize, Serialize};

use stockbook_core::{CategoryId, Error, ProductId, Result, SupplierId, WarehouseId};

use crate::serde_util::double_option;

/// A product record.
///
/// Current stock is deliberately **not** a field here: it is derived from
/// the movement ledger on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit: String,
    pub min_stock: i64,
    /// Unique when present. An empty submitted barcode is normalized to
    /// absent so that two barcode-less products never collide.
    pub barcode: Option<String>,
    pub supplier_id: Option<SupplierId>,
    pub category_id: Option<CategoryId>,
    pub warehouse_id: Option<WarehouseId>,
}

/// Normalize a submitted barcode: trimmed, empty becomes absent.
pub fn normalize_barcode(barcode: Option<String>) -> Option<String> {
    barcode
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
}

/// Input for creating a product. Exactly these fields; nothing else merges.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProduct {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub min_stock: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub warehouse_id: Option<WarehouseId>,
}

impl NewProduct {
    /// Validate and assign an identity.
    pub fn build(self) -> Result<Product> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("product name cannot be empty"));
        }
        let unit = self.unit.trim().to_string();
        if unit.is_empty() {
            return Err(Error::validation("product unit cannot be empty"));
        }
        if self.min_stock < 0 {
            return Err(Error::validation("minimum stock cannot be negative"));
        }
        Ok(Product {
            id: ProductId::new(),
            name,
            unit,
            min_stock: self.min_stock,
            barcode: normalize_barcode(self.barcode),
            supplier_id: self.supplier_id,
            category_id: self.category_id,
            warehouse_id: self.warehouse_id,
        })
    }
}

/// Partial update for a product. Absent fields keep their value; nullable
/// associations distinguish "absent" from "null" (clear).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub barcode: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub supplier_id: Option<Option<SupplierId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub warehouse_id: Option<Option<WarehouseId>>,
}

impl ProductUpdate {
    /// Merge this update into an existing product, validating changed fields.
    pub fn apply(self, product: &mut Product) -> Result<()> {
        if let Some(name) = self.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::validation("product name cannot be empty"));
            }
            product.name = name;
        }
        if let Some(unit) = self.unit {
            let unit = unit.trim().to_string();
            if unit.is_empty() {
                return Err(Error::validation("product unit cannot be empty"));
            }
            product.unit = unit;
        }
        if let Some(min_stock) = self.min_stock {
            if min_stock < 0 {
                return Err(Error::validation("minimum stock cannot be negative"));
            }
            product.min_stock = min_stock;
        }
        if let Some(barcode) = self.barcode {
            product.barcode = normalize_barcode(barcode);
        }
        if let Some(supplier_id) = self.supplier_id {
            product.supplier_id = supplier_id;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(warehouse_id) = self.warehouse_id {
            product.warehouse_id = warehouse_id;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, barcode: Option<&str>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            unit: "piece".to_string(),
            min_stock: 5,
            barcode: barcode.map(str::to_string),
            supplier_id: None,
            category_id: None,
            warehouse_id: None,
        }
    }

    #[test]
    fn empty_barcode_is_stored_as_absent() {
        let product = new_product("Widget", Some("")).build().unwrap();
        assert_eq!(product.barcode, None);
    }

    #[test]
    fn whitespace_barcode_is_stored_as_absent() {
        let product = new_product("Widget", Some("   ")).build().unwrap();
        assert_eq!(product.barcode, None);
    }

    #[test]
    fn present_barcode_is_kept() {
        let product = new_product("Widget", Some("4006381333931")).build().unwrap();
        assert_eq!(product.barcode.as_deref(), Some("4006381333931"));
    }

    #[test]
    fn rejects_empty_name() {
        let err = new_product("   ", None).build().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_negative_min_stock() {
        let mut input = new_product("Widget", None);
        input.min_stock = -1;
        assert!(input.build().is_err());
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut product = new_product("Widget", Some("123")).build().unwrap();
        let update: ProductUpdate =
            serde_json::from_str(r#"{"min_stock": 9, "barcode": null}"#).unwrap();
        update.apply(&mut product).unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.min_stock, 9);
        assert_eq!(product.barcode, None);
    }

    #[test]
    fn update_rejects_unknown_fields() {
        // Callers cannot smuggle arbitrary columns into a merge.
        let result = serde_json::from_str::<ProductUpdate>(r#"{"approver": "x@y.z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_clearing_supplier_differs_from_omitting_it() {
        let cleared: ProductUpdate = serde_json::from_str(r#"{"supplier_id": null}"#).unwrap();
        assert_eq!(cleared.supplier_id, Some(None));

        let untouched: ProductUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(untouched.supplier_id, None);
    }
}

//! Joined read models for the initial-load endpoint.
//!
//! The row modules store plain references (ids and emails); everything here
//! joins them in memory into the shapes callers render directly. Emails on a
//! request are recorded history, so a joined user is optional even where the
//! email is not.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockbook_catalog::{Category, Product, PublicUser, Supplier, Warehouse};
use stockbook_core::{EmailAddress, RequestId, Result};
use stockbook_ledger::Movement;
use stockbook_procurement::{PurchaseRequest, RequestItem, RequestStatus};

use crate::Store;

/// A product with its catalog references resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub supplier: Option<Supplier>,
    pub category: Option<Category>,
    pub warehouse: Option<Warehouse>,
}

/// A request line item with its product resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestItemDetail {
    #[serde(flatten)]
    pub item: RequestItem,
    pub product: Option<ProductDetail>,
}

/// A purchase request with items and involved users resolved.
///
/// The `*_user` fields are `None` when the recorded email no longer matches
/// an existing user; the email itself stays on the flattened header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: PurchaseRequest,
    pub requester_user: Option<PublicUser>,
    pub approver_user: Option<PublicUser>,
    pub receiver_user: Option<PublicUser>,
    pub items: Vec<RequestItemDetail>,
}

impl RequestDetail {
    pub fn id(&self) -> RequestId {
        self.request.id
    }

    pub fn status(&self) -> RequestStatus {
        self.request.status
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.request.requested_at
    }
}

/// Everything a client needs to render its initial screen.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub users: Vec<PublicUser>,
    pub products: Vec<ProductDetail>,
    pub suppliers: Vec<Supplier>,
    pub categories: Vec<Category>,
    pub warehouses: Vec<Warehouse>,
    pub recent_movements: Vec<Movement>,
    pub requests: Vec<RequestDetail>,
}

/// How many movements the snapshot carries.
const SNAPSHOT_MOVEMENT_LIMIT: i64 = 200;

struct CatalogIndex {
    suppliers: HashMap<stockbook_core::SupplierId, Supplier>,
    categories: HashMap<stockbook_core::CategoryId, Category>,
    warehouses: HashMap<stockbook_core::WarehouseId, Warehouse>,
}

impl CatalogIndex {
    fn resolve(&self, product: Product) -> ProductDetail {
        let supplier = product
            .supplier_id
            .and_then(|id| self.suppliers.get(&id).cloned());
        let category = product
            .category_id
            .and_then(|id| self.categories.get(&id).cloned());
        let warehouse = product
            .warehouse_id
            .and_then(|id| self.warehouses.get(&id).cloned());
        ProductDetail {
            product,
            supplier,
            category,
            warehouse,
        }
    }
}

impl Store {
    async fn catalog_index(&self) -> Result<CatalogIndex> {
        let suppliers = self
            .list_suppliers()
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let categories = self
            .list_categories()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let warehouses = self
            .list_warehouses()
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();
        Ok(CatalogIndex {
            suppliers,
            categories,
            warehouses,
        })
    }

    async fn public_users(&self) -> Result<HashMap<EmailAddress, PublicUser>> {
        Ok(self
            .list_users()
            .await?
            .iter()
            .map(|u| (u.email.clone(), u.public()))
            .collect())
    }

    /// All products with their catalog references resolved.
    pub async fn products_detailed(&self) -> Result<Vec<ProductDetail>> {
        let index = self.catalog_index().await?;
        Ok(self
            .list_products()
            .await?
            .into_iter()
            .map(|p| index.resolve(p))
            .collect())
    }

    fn assemble_request_detail(
        request: PurchaseRequest,
        items: Vec<RequestItem>,
        products: &HashMap<stockbook_core::ProductId, ProductDetail>,
        users: &HashMap<EmailAddress, PublicUser>,
    ) -> RequestDetail {
        let requester_user = users.get(&request.requester).cloned();
        let approver_user = request
            .approver
            .as_ref()
            .and_then(|email| users.get(email).cloned());
        let receiver_user = request
            .receiver
            .as_ref()
            .and_then(|email| users.get(email).cloned());
        let items = items
            .into_iter()
            .map(|item| RequestItemDetail {
                product: products.get(&item.product_id).cloned(),
                item,
            })
            .collect();
        RequestDetail {
            request,
            requester_user,
            approver_user,
            receiver_user,
            items,
        }
    }

    /// One purchase request, fully joined.
    pub async fn request_detail(&self, id: RequestId) -> Result<RequestDetail> {
        let request = self.get_request(id).await?;
        let items = self.get_request_items(id).await?;
        let products: HashMap<_, _> = self
            .products_detailed()
            .await?
            .into_iter()
            .map(|d| (d.product.id, d))
            .collect();
        let users = self.public_users().await?;
        Ok(Self::assemble_request_detail(request, items, &products, &users))
    }

    /// The full initial-load view in one call.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let index = self.catalog_index().await?;
        let users = self.public_users().await?;

        let products: Vec<ProductDetail> = self
            .list_products()
            .await?
            .into_iter()
            .map(|p| index.resolve(p))
            .collect();
        let by_id: HashMap<_, _> = products
            .iter()
            .map(|d| (d.product.id, d.clone()))
            .collect();

        let mut requests = Vec::new();
        for request in self.list_requests().await? {
            let items = self.get_request_items(request.id).await?;
            requests.push(Self::assemble_request_detail(
                request, items, &by_id, &users,
            ));
        }

        Ok(Snapshot {
            users: users.into_values().collect(),
            products,
            suppliers: index.suppliers.into_values().collect(),
            categories: index.categories.into_values().collect(),
            warehouses: index.warehouses.into_values().collect(),
            recent_movements: self.recent_movements(SNAPSHOT_MOVEMENT_LIMIT).await?,
            requests,
        })
    }
}

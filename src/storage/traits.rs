use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem, OrderType};
use crate::domain::product::Product;
use crate::domain::shipment::Shipment;
use crate::domain::store::Store;
use crate::shipping::ShippingMethod;

// ============================================================================
// Repository Traits
// ============================================================================

/// Order persistence.
///
/// `save` is an upsert; `find_by_marketplace_ref` backs the split
/// idempotence guard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStorage: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<Order>>;

    async fn save(&self, order: &Order) -> Result<()>;

    /// All orders whose `marketplace_ref` equals the given order id.
    async fn find_by_marketplace_ref(&self, marketplace_order_id: Uuid) -> Result<Vec<Order>>;

    /// The cart-flagged order for (type, store, customer), if one exists.
    async fn find_cart(
        &self,
        order_type: &str,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Order>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderItemStorage: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<OrderItem>>;

    /// Loads the items that exist, preserving the input order.
    async fn load_many(&self, ids: &[Uuid]) -> Result<Vec<OrderItem>>;

    async fn save(&self, item: &OrderItem) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentStorage: Send + Sync {
    /// Loads the shipments that exist, preserving the input order.
    async fn load_many(&self, ids: &[Uuid]) -> Result<Vec<Shipment>>;

    async fn save(&self, shipment: &Shipment) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStorage: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<Product>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreStorage: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<Store>>;

    /// The installation's default store.
    async fn load_default(&self) -> Result<Option<Store>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderTypeStorage: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<OrderType>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShippingMethodStorage: Send + Sync {
    /// Active shipping methods registered for the given store.
    async fn load_active_for_store(&self, store_id: Uuid) -> Result<Vec<ShippingMethod>>;
}

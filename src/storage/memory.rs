use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem, OrderType};
use crate::domain::product::Product;
use crate::domain::shipment::Shipment;
use crate::domain::store::Store;
use crate::shipping::ShippingMethod;

use super::traits::*;

// ============================================================================
// In-Memory Backends
// ============================================================================
//
// Map-backed implementations of the repository traits. They power the
// demo binary and the test suite; a real deployment would put a database
// behind the same traits.
//
// The mutating stores count writes so tests can assert that an operation
// performed none.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryOrderStorage {
    orders: RwLock<HashMap<Uuid, Order>>,
    writes: AtomicU64,
}

impl InMemoryOrderStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.orders.read().await.len()
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl OrderStorage for InMemoryOrderStorage {
    async fn load(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn save(&self, order: &Order) -> Result<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_marketplace_ref(&self, marketplace_order_id: Uuid) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.marketplace_ref == Some(marketplace_order_id))
            .cloned()
            .collect())
    }

    async fn find_cart(
        &self,
        order_type: &str,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|o| {
                o.cart
                    && o.order_type == order_type
                    && o.store_id == store_id
                    && o.customer_id == customer_id
            })
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryOrderItemStorage {
    items: RwLock<HashMap<Uuid, OrderItem>>,
    writes: AtomicU64,
}

impl InMemoryOrderItemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl OrderItemStorage for InMemoryOrderItemStorage {
    async fn load(&self, id: Uuid) -> Result<Option<OrderItem>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn load_many(&self, ids: &[Uuid]) -> Result<Vec<OrderItem>> {
        let items = self.items.read().await;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn save(&self, item: &OrderItem) -> Result<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.items.write().await.insert(item.id, item.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryShipmentStorage {
    shipments: RwLock<HashMap<Uuid, Shipment>>,
    writes: AtomicU64,
}

impl InMemoryShipmentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ShipmentStorage for InMemoryShipmentStorage {
    async fn load_many(&self, ids: &[Uuid]) -> Result<Vec<Shipment>> {
        let shipments = self.shipments.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| shipments.get(id).cloned())
            .collect())
    }

    async fn save(&self, shipment: &Shipment) -> Result<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.shipments
            .write()
            .await
            .insert(shipment.id, shipment.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProductStorage {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }
}

#[async_trait]
impl ProductStorage for InMemoryProductStorage {
    async fn load(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }
}

pub struct InMemoryStoreStorage {
    stores: RwLock<HashMap<Uuid, Store>>,
    default_store_id: RwLock<Option<Uuid>>,
}

impl InMemoryStoreStorage {
    pub fn new() -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
            default_store_id: RwLock::new(None),
        }
    }

    pub async fn insert(&self, store: Store) {
        self.stores.write().await.insert(store.id, store);
    }

    /// Registers a store and marks it as the installation default.
    pub async fn insert_default(&self, store: Store) {
        *self.default_store_id.write().await = Some(store.id);
        self.insert(store).await;
    }
}

#[async_trait]
impl StoreStorage for InMemoryStoreStorage {
    async fn load(&self, id: Uuid) -> Result<Option<Store>> {
        Ok(self.stores.read().await.get(&id).cloned())
    }

    async fn load_default(&self) -> Result<Option<Store>> {
        let id = *self.default_store_id.read().await;
        match id {
            Some(id) => self.load(id).await,
            None => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct InMemoryOrderTypeStorage {
    types: RwLock<HashMap<String, OrderType>>,
}

impl InMemoryOrderTypeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order_type: OrderType) {
        self.types
            .write()
            .await
            .insert(order_type.id.clone(), order_type);
    }
}

#[async_trait]
impl OrderTypeStorage for InMemoryOrderTypeStorage {
    async fn load(&self, id: &str) -> Result<Option<OrderType>> {
        Ok(self.types.read().await.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryShippingMethodStorage {
    methods: RwLock<HashMap<Uuid, ShippingMethod>>,
}

impl InMemoryShippingMethodStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, method: ShippingMethod) {
        self.methods.write().await.insert(method.id, method);
    }
}

#[async_trait]
impl ShippingMethodStorage for InMemoryShippingMethodStorage {
    async fn load_active_for_store(&self, store_id: Uuid) -> Result<Vec<ShippingMethod>> {
        Ok(self
            .methods
            .read()
            .await
            .values()
            .filter(|m| m.status && m.store_ids.contains(&store_id))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_order_save_and_load() {
        let storage = InMemoryOrderStorage::new();
        let order = Order::new_cart("default", Uuid::new_v4(), Uuid::new_v4());
        storage.save(&order).await.unwrap();

        let loaded = storage.load(order.id).await.unwrap().unwrap();
        assert_eq!(loaded, order);
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_find_by_marketplace_ref() {
        let storage = InMemoryOrderStorage::new();
        let parent_id = Uuid::new_v4();

        let mut sub = Order::new_cart("default", Uuid::new_v4(), Uuid::new_v4());
        sub.marketplace_ref = Some(parent_id);
        storage.save(&sub).await.unwrap();

        let unrelated = Order::new_cart("default", Uuid::new_v4(), Uuid::new_v4());
        storage.save(&unrelated).await.unwrap();

        let found = storage.find_by_marketplace_ref(parent_id).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, sub.id);
    }

    #[tokio::test]
    async fn test_find_cart_matches_all_dimensions() {
        let storage = InMemoryOrderStorage::new();
        let store_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();

        let cart = Order::new_cart("marketplace", store_id, customer_id);
        storage.save(&cart).await.unwrap();

        let mut placed = Order::new_cart("marketplace", store_id, customer_id);
        placed.cart = false;
        storage.save(&placed).await.unwrap();

        let found = storage
            .find_cart("marketplace", store_id, customer_id)
            .await
            .unwrap();
        assert_eq!(found.map(|o| o.id), Some(cart.id));

        let other = storage
            .find_cart("default", store_id, customer_id)
            .await
            .unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_load_many_skips_missing() {
        let storage = InMemoryOrderItemStorage::new();
        let product = Product::new("Tent", vec![Uuid::new_v4()], Money::new(dec!(10), "USD"));
        let item = OrderItem::for_product(&product, dec!(1));
        storage.save(&item).await.unwrap();

        let loaded = storage
            .load_many(&[item.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn test_default_store() {
        let storage = InMemoryStoreStorage::new();
        assert!(storage.load_default().await.unwrap().is_none());

        let store = Store::new("Marketplace");
        storage.insert_default(store.clone()).await;
        assert_eq!(storage.load_default().await.unwrap(), Some(store));
    }

    #[tokio::test]
    async fn test_shipping_methods_filtered_by_store_and_status() {
        let storage = InMemoryShippingMethodStorage::new();
        let store_a = Uuid::new_v4();
        let store_b = Uuid::new_v4();

        storage.insert(ShippingMethod::new("A post", vec![store_a])).await;
        let mut inactive = ShippingMethod::new("Dormant", vec![store_a]);
        inactive.status = false;
        storage.insert(inactive).await;
        storage.insert(ShippingMethod::new("B post", vec![store_b])).await;

        let methods = storage.load_active_for_store(store_a).await.unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "A post");
    }
}

use std::sync::Arc;

use anyhow::{bail, Result};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem};
use crate::domain::store::Store;
use crate::resolvers::OrderTypeResolver;
use crate::storage::{OrderItemStorage, ProductStorage};

use super::errors::SplitError;
use super::store_selector::StoreSelector;

// ============================================================================
// Item Grouper
// ============================================================================

/// One store's slice of a marketplace order.
#[derive(Debug, Clone)]
pub struct StoreGroup {
    pub store: Option<Store>,
    pub order_type_id: String,
    pub items: Vec<OrderItem>,
}

/// Partitions an order's line items by owning store.
pub struct ItemGrouper {
    order_items: Arc<dyn OrderItemStorage>,
    products: Arc<dyn ProductStorage>,
    store_selector: StoreSelector,
    order_type_resolver: Arc<dyn OrderTypeResolver>,
}

impl ItemGrouper {
    pub fn new(
        order_items: Arc<dyn OrderItemStorage>,
        products: Arc<dyn ProductStorage>,
        store_selector: StoreSelector,
        order_type_resolver: Arc<dyn OrderTypeResolver>,
    ) -> Self {
        Self {
            order_items,
            products,
            store_selector,
            order_type_resolver,
        }
    }

    /// Groups line items under their store's name. The group's store and
    /// order type are overwritten on every matching item; all items of
    /// one store name resolve to the same store, so the last writer wins
    /// harmlessly.
    pub async fn group_by_store(
        &self,
        order: &Order,
        current_store_id: Uuid,
    ) -> Result<IndexMap<String, StoreGroup>> {
        let items = self.order_items.load_many(&order.item_ids).await?;
        if items.len() != order.item_ids.len() {
            bail!("order {} references line items that do not exist", order.id);
        }

        let mut groups: IndexMap<String, StoreGroup> = IndexMap::new();
        for item in items {
            let product = self
                .products
                .load(item.purchased_entity_id)
                .await?
                .ok_or(SplitError::MissingProduct(item.id))?;
            let store = self.store_selector.select(&product, current_store_id).await?;
            let order_type_id = self.order_type_resolver.resolve(&item);

            let group = groups
                .entry(store.name.clone())
                .or_insert_with(|| StoreGroup {
                    store: None,
                    order_type_id: order_type_id.clone(),
                    items: Vec::new(),
                });
            group.store = Some(store);
            group.order_type_id = order_type_id;
            group.items.push(item);
        }

        Ok(groups)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::product::Product;
    use crate::resolvers::DefaultOrderTypeResolver;
    use crate::storage::{
        InMemoryOrderItemStorage, InMemoryProductStorage, InMemoryStoreStorage,
    };
    use rust_decimal_macros::dec;

    struct Fixture {
        order_items: Arc<InMemoryOrderItemStorage>,
        products: Arc<InMemoryProductStorage>,
        stores: Arc<InMemoryStoreStorage>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                order_items: Arc::new(InMemoryOrderItemStorage::new()),
                products: Arc::new(InMemoryProductStorage::new()),
                stores: Arc::new(InMemoryStoreStorage::new()),
            }
        }

        fn grouper(&self) -> ItemGrouper {
            ItemGrouper::new(
                self.order_items.clone(),
                self.products.clone(),
                StoreSelector::new(self.stores.clone()),
                Arc::new(DefaultOrderTypeResolver::new("default")),
            )
        }

        async fn add_item(&self, order: &mut Order, store_ids: Vec<Uuid>, title: &str) -> Uuid {
            let product = Product::new(title, store_ids, Money::new(dec!(10), "USD"));
            let mut item = OrderItem::for_product(&product, dec!(1));
            item.order_id = Some(order.id);
            self.products.insert(product).await;
            self.order_items.save(&item).await.unwrap();
            order.item_ids.push(item.id);
            item.id
        }
    }

    #[tokio::test]
    async fn test_items_grouped_exactly_by_resolved_store() {
        let fixture = Fixture::new();
        let store_a = Store::new("Acme Outdoors");
        let store_b = Store::new("North Books");
        fixture.stores.insert(store_a.clone()).await;
        fixture.stores.insert(store_b.clone()).await;

        let mut order = Order::new_cart("marketplace", store_a.id, Uuid::new_v4());
        let tent_id = fixture.add_item(&mut order, vec![store_a.id], "Tent").await;
        let atlas_id = fixture.add_item(&mut order, vec![store_b.id], "Atlas").await;
        let stove_id = fixture.add_item(&mut order, vec![store_a.id], "Stove").await;

        let groups = fixture
            .grouper()
            .group_by_store(&order, store_a.id)
            .await
            .unwrap();
        assert_eq!(groups.len(), 2);

        let group_a = &groups["Acme Outdoors"];
        assert_eq!(group_a.store.as_ref().map(|s| s.id), Some(store_a.id));
        assert_eq!(group_a.order_type_id, "default");
        let ids_a: Vec<_> = group_a.items.iter().map(|i| i.id).collect();
        assert_eq!(ids_a, vec![tent_id, stove_id]);

        let group_b = &groups["North Books"];
        assert_eq!(group_b.items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![atlas_id]);
    }

    #[tokio::test]
    async fn test_missing_line_item_fails() {
        let fixture = Fixture::new();
        let mut order = Order::new_cart("marketplace", Uuid::new_v4(), Uuid::new_v4());
        order.item_ids.push(Uuid::new_v4());

        let result = fixture.grouper().group_by_store(&order, Uuid::new_v4()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_product_fails() {
        let fixture = Fixture::new();
        let store = Store::new("Acme Outdoors");
        fixture.stores.insert(store.clone()).await;

        let mut order = Order::new_cart("marketplace", store.id, Uuid::new_v4());
        let product = Product::new("Tent", vec![store.id], Money::new(dec!(10), "USD"));
        let mut item = OrderItem::for_product(&product, dec!(1));
        item.order_id = Some(order.id);
        // Product intentionally never stored.
        fixture.order_items.save(&item).await.unwrap();
        order.item_ids.push(item.id);

        let err = fixture
            .grouper()
            .group_by_store(&order, store.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::MissingProduct(_))
        ));
    }
}

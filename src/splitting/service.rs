use std::sync::Arc;

use anyhow::{bail, Result};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::cart::{CartManager, CartProvider};
use crate::domain::order::Order;
use crate::resolvers::{ChainPriceResolver, NumberPatternRegistry, PriceContext};
use crate::storage::{
    OrderItemStorage, OrderStorage, OrderTypeStorage, ProductStorage, ShipmentStorage,
    StoreStorage,
};

use super::errors::SplitError;
use super::grouper::ItemGrouper;

// ============================================================================
// Marketplace Order Service - Sub-Order Orchestration
// ============================================================================

/// The acting request context: which store the caller is browsing and
/// which user owns the created sub-orders. Threaded explicitly instead of
/// read from ambient globals.
#[derive(Debug, Clone, Copy)]
pub struct SplitContext {
    pub current_store_id: Uuid,
    pub current_user_id: Uuid,
}

/// Splits a placed marketplace order into per-store sub-orders.
pub struct MarketplaceOrderService {
    orders: Arc<dyn OrderStorage>,
    order_items: Arc<dyn OrderItemStorage>,
    shipments: Arc<dyn ShipmentStorage>,
    order_types: Arc<dyn OrderTypeStorage>,
    products: Arc<dyn ProductStorage>,
    stores: Arc<dyn StoreStorage>,
    grouper: ItemGrouper,
    cart_provider: CartProvider,
    cart_manager: CartManager,
    price_resolver: Arc<ChainPriceResolver>,
    number_patterns: Arc<NumberPatternRegistry>,
}

impl MarketplaceOrderService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orders: Arc<dyn OrderStorage>,
        order_items: Arc<dyn OrderItemStorage>,
        shipments: Arc<dyn ShipmentStorage>,
        order_types: Arc<dyn OrderTypeStorage>,
        products: Arc<dyn ProductStorage>,
        stores: Arc<dyn StoreStorage>,
        grouper: ItemGrouper,
        cart_provider: CartProvider,
        cart_manager: CartManager,
        price_resolver: Arc<ChainPriceResolver>,
        number_patterns: Arc<NumberPatternRegistry>,
    ) -> Self {
        Self {
            orders,
            order_items,
            shipments,
            order_types,
            products,
            stores,
            grouper,
            cart_provider,
            cart_manager,
            price_resolver,
            number_patterns,
        }
    }

    /// Creates one finalized sub-order per store represented on the
    /// marketplace order, keyed by store name.
    ///
    /// Splitting happens at most once per marketplace order: when any
    /// sub-order already references it, the call returns an empty map and
    /// performs no writes. The first error aborts the whole operation;
    /// sub-orders committed for earlier stores are NOT rolled back, the
    /// surrounding storage transaction boundary (if any) governs
    /// atomicity.
    pub async fn create_sub_orders(
        &self,
        order: &Order,
        ctx: &SplitContext,
    ) -> Result<IndexMap<String, Order>> {
        let mut sub_orders = IndexMap::new();

        if !order.state.is_placed() {
            bail!("order {} has not been placed, refusing to split", order.id);
        }

        // Splitting occurs once, when the marketplace order is placed and
        // no sub-orders exist yet.
        let existing = self.orders.find_by_marketplace_ref(order.id).await?;
        if !existing.is_empty() {
            tracing::info!(
                order_id = %order.id,
                existing = existing.len(),
                "Sub-orders already exist, nothing to split"
            );
            return Ok(sub_orders);
        }

        let order_state = order.state;
        let billing_profile_id = order.billing_profile_id;
        let parent_shipments = self.shipments.load_many(&order.shipment_ids).await?;
        let groups = self.grouper.group_by_store(order, ctx.current_store_id).await?;

        tracing::info!(
            order_id = %order.id,
            store_count = groups.len(),
            "Splitting marketplace order"
        );

        for (store_name, group) in groups {
            let store = match group.store {
                Some(store) => store,
                None => self
                    .stores
                    .load_default()
                    .await?
                    .ok_or(SplitError::NoDefaultStore)?,
            };

            // The sub-order starts as a cart owned by the acting user.
            let mut sub_order =
                Order::new_cart(group.order_type_id.clone(), store.id, ctx.current_user_id);

            let order_type = self
                .order_types
                .load(&group.order_type_id)
                .await?
                .ok_or_else(|| SplitError::UnknownOrderType(group.order_type_id.clone()))?;
            if !order_type.has_marketplace_reference {
                return Err(SplitError::MissingMarketplaceReference(order_type.id).into());
            }

            // Persist before item duplication so the id exists for linkage.
            self.orders.save(&sub_order).await?;

            let price_context = PriceContext {
                customer_id: sub_order.customer_id,
                store_id: sub_order.store_id,
                calculated_at: sub_order.calculation_date(),
            };

            let mut duplicate_ids = Vec::with_capacity(group.items.len());
            for item in &group.items {
                let product = self
                    .products
                    .load(item.purchased_entity_id)
                    .await?
                    .ok_or(SplitError::MissingProduct(item.id))?;

                let mut duplicate = self.cart_manager.create_order_item(&product, item.quantity);
                if item.unit_price_overridden {
                    // Explicit prices survive the split untouched.
                    duplicate.override_unit_price(item.unit_price.clone());
                } else {
                    duplicate.unit_price = self
                        .price_resolver
                        .resolve(&product, item.quantity, &price_context)
                        .await?;
                }
                duplicate.order_id = Some(sub_order.id);
                self.order_items.save(&duplicate).await?;
                duplicate_ids.push(duplicate.id);
            }
            sub_order.item_ids = duplicate_ids;

            // The billing profile is shared by reference, not duplicated.
            if let Some(profile_id) = billing_profile_id {
                sub_order.billing_profile_id = Some(profile_id);
            }
            sub_order.state = order_state;
            sub_order.marketplace_ref = Some(order.id);

            let mut copied_shipment_ids = Vec::new();
            for shipment in parent_shipments
                .iter()
                .filter(|s| s.store_id() == Some(store.id))
            {
                let mut duplicate = shipment.duplicate();
                duplicate.order_id = sub_order.id;
                self.shipments.save(&duplicate).await?;
                copied_shipment_ids.push(duplicate.id);
            }
            if !copied_shipment_ids.is_empty() {
                sub_order.shipment_ids = copied_shipment_ids;
                // Shipping adjustments must recompute against the new
                // shipment set on the next save.
                sub_order.refresh_on_save = true;
            }

            sub_order.placed_at = order.placed_at;
            self.assign_order_number(&mut sub_order).await?;
            self.cart_provider.finalize_cart(&mut sub_order).await?;

            tracing::info!(
                order_id = %order.id,
                sub_order_id = %sub_order.id,
                store = %store.name,
                item_count = sub_order.item_ids.len(),
                shipment_count = sub_order.shipment_ids.len(),
                "Created sub-order"
            );

            sub_orders.insert(store_name, sub_order);
        }

        Ok(sub_orders)
    }

    /// Assigns an order number if none is set: the type's configured
    /// number pattern when one is registered, otherwise the order's own
    /// id. An existing number is never replaced.
    pub async fn assign_order_number(&self, order: &mut Order) -> Result<()> {
        if order.number.is_some() {
            return Ok(());
        }

        let pattern_id = self
            .order_types
            .load(&order.order_type)
            .await?
            .and_then(|t| t.number_pattern);
        let number = match pattern_id.as_deref().and_then(|id| self.number_patterns.get(id)) {
            Some(pattern) => pattern.generate(order),
            None => order.id.to_string(),
        };

        order.number = Some(number);
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::order::{OrderItem, OrderState, OrderType};
    use crate::domain::product::Product;
    use crate::domain::store::Store;
    use crate::resolvers::price::MockPriceResolver;
    use crate::resolvers::DefaultOrderTypeResolver;
    use crate::splitting::StoreSelector;
    use crate::storage::{
        InMemoryOrderItemStorage, InMemoryOrderStorage, InMemoryOrderTypeStorage,
        InMemoryProductStorage, InMemoryShipmentStorage, InMemoryStoreStorage,
    };
    use rust_decimal_macros::dec;

    struct Fixture {
        orders: Arc<InMemoryOrderStorage>,
        order_items: Arc<InMemoryOrderItemStorage>,
        shipments: Arc<InMemoryShipmentStorage>,
        order_types: Arc<InMemoryOrderTypeStorage>,
        products: Arc<InMemoryProductStorage>,
        stores: Arc<InMemoryStoreStorage>,
    }

    impl Fixture {
        async fn new() -> Self {
            let fixture = Self {
                orders: Arc::new(InMemoryOrderStorage::new()),
                order_items: Arc::new(InMemoryOrderItemStorage::new()),
                shipments: Arc::new(InMemoryShipmentStorage::new()),
                order_types: Arc::new(InMemoryOrderTypeStorage::new()),
                products: Arc::new(InMemoryProductStorage::new()),
                stores: Arc::new(InMemoryStoreStorage::new()),
            };
            fixture
                .order_types
                .insert(OrderType {
                    id: "default".to_string(),
                    label: "Default".to_string(),
                    has_marketplace_reference: true,
                    number_pattern: None,
                })
                .await;
            fixture
        }

        fn service(&self, price_resolver: ChainPriceResolver) -> MarketplaceOrderService {
            let grouper = ItemGrouper::new(
                self.order_items.clone(),
                self.products.clone(),
                StoreSelector::new(self.stores.clone()),
                Arc::new(DefaultOrderTypeResolver::new("default")),
            );
            MarketplaceOrderService::new(
                self.orders.clone(),
                self.order_items.clone(),
                self.shipments.clone(),
                self.order_types.clone(),
                self.products.clone(),
                self.stores.clone(),
                grouper,
                CartProvider::new(self.orders.clone()),
                CartManager::new(self.orders.clone(), self.order_items.clone()),
                Arc::new(price_resolver),
                Arc::new(NumberPatternRegistry::new()),
            )
        }

        async fn placed_order_with_item(&self, store: &Store, item: OrderItem) -> Order {
            let mut order = Order::new_cart("marketplace", store.id, Uuid::new_v4());
            self.order_items.save(&item).await.unwrap();
            order.item_ids.push(item.id);
            order.state = OrderState::Placed;
            order.cart = false;
            order.placed_at = Some(chrono::Utc::now());
            self.orders.save(&order).await.unwrap();
            order
        }
    }

    #[tokio::test]
    async fn test_overridden_price_skips_resolution() {
        let fixture = Fixture::new().await;
        let store = Store::new("Acme Outdoors");
        fixture.stores.insert(store.clone()).await;

        let product = Product::new("Tent", vec![store.id], Money::new(dec!(120), "USD"));
        fixture.products.insert(product.clone()).await;

        let mut item = OrderItem::for_product(&product, dec!(2));
        item.override_unit_price(Money::new(dec!(80), "USD"));
        let order = fixture.placed_order_with_item(&store, item).await;

        // The resolver must never be consulted for an overridden price.
        let mut resolver = MockPriceResolver::new();
        resolver.expect_resolve().times(0);

        let service = fixture.service(ChainPriceResolver::new(vec![Arc::new(resolver)]));
        let sub_orders = service
            .create_sub_orders(
                &order,
                &SplitContext {
                    current_store_id: store.id,
                    current_user_id: order.customer_id,
                },
            )
            .await
            .unwrap();

        let sub = &sub_orders["Acme Outdoors"];
        let items = fixture.order_items.load_many(&sub.item_ids).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, Money::new(dec!(80), "USD"));
        assert!(items[0].unit_price_overridden);
    }

    #[tokio::test]
    async fn test_regular_price_is_re_resolved_with_sub_order_context() {
        let fixture = Fixture::new().await;
        let store = Store::new("Acme Outdoors");
        fixture.stores.insert(store.clone()).await;

        let product = Product::new("Tent", vec![store.id], Money::new(dec!(120), "USD"));
        fixture.products.insert(product.clone()).await;

        let item = OrderItem::for_product(&product, dec!(2));
        let order = fixture.placed_order_with_item(&store, item).await;

        let store_id = store.id;
        let mut resolver = MockPriceResolver::new();
        resolver
            .expect_resolve()
            .withf(move |_, quantity, context| {
                *quantity == dec!(2) && context.store_id == store_id
            })
            .times(1)
            .returning(|_, _, _| Ok(Some(Money::new(dec!(99), "USD"))));

        let service = fixture.service(ChainPriceResolver::new(vec![Arc::new(resolver)]));
        let sub_orders = service
            .create_sub_orders(
                &order,
                &SplitContext {
                    current_store_id: store.id,
                    current_user_id: order.customer_id,
                },
            )
            .await
            .unwrap();

        let sub = &sub_orders["Acme Outdoors"];
        let items = fixture.order_items.load_many(&sub.item_ids).await.unwrap();
        assert_eq!(items[0].unit_price, Money::new(dec!(99), "USD"));
        assert!(!items[0].unit_price_overridden);
    }

    #[tokio::test]
    async fn test_sub_order_type_without_reference_field_fails() {
        let fixture = Fixture::new().await;
        fixture
            .order_types
            .insert(OrderType {
                id: "default".to_string(),
                label: "Default".to_string(),
                has_marketplace_reference: false,
                number_pattern: None,
            })
            .await;

        let store = Store::new("Acme Outdoors");
        fixture.stores.insert(store.clone()).await;
        let product = Product::new("Tent", vec![store.id], Money::new(dec!(120), "USD"));
        fixture.products.insert(product.clone()).await;
        let item = OrderItem::for_product(&product, dec!(1));
        let order = fixture.placed_order_with_item(&store, item).await;

        let service = fixture.service(ChainPriceResolver::new(vec![]));
        let err = service
            .create_sub_orders(
                &order,
                &SplitContext {
                    current_store_id: store.id,
                    current_user_id: order.customer_id,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::MissingMarketplaceReference(_))
        ));
    }

    #[tokio::test]
    async fn test_unplaced_order_is_rejected() {
        let fixture = Fixture::new().await;
        let store = Store::new("Acme Outdoors");
        fixture.stores.insert(store.clone()).await;

        let order = Order::new_cart("marketplace", store.id, Uuid::new_v4());
        let service = fixture.service(ChainPriceResolver::new(vec![]));
        let result = service
            .create_sub_orders(
                &order,
                &SplitContext {
                    current_store_id: store.id,
                    current_user_id: order.customer_id,
                },
            )
            .await;
        assert!(result.is_err());
    }
}

use std::sync::Arc;

use actix::prelude::*;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use marketplace_orders::actors::{OrderPlaced, OrderPlacedSubscriber};
use marketplace_orders::cart::{CartManager, CartProvider, MarketplaceAddToCart};
use marketplace_orders::config::AppConfig;
use marketplace_orders::domain::order::{OrderState, OrderType};
use marketplace_orders::domain::{Money, Product, Shipment, Store, Weight, WeightUnit};
use marketplace_orders::metrics;
use marketplace_orders::resolvers::{
    ChainPriceResolver, DefaultOrderTypeResolver, ListPriceResolver, NumberPatternRegistry,
    SequentialNumberPattern,
};
use marketplace_orders::shipping::{
    MethodCondition, ShippingMethod, StoreMethodLoader, StorePacker,
};
use marketplace_orders::splitting::{ItemGrouper, MarketplaceOrderService, StoreSelector};
use marketplace_orders::storage::{
    InMemoryOrderItemStorage, InMemoryOrderStorage, InMemoryOrderTypeStorage,
    InMemoryProductStorage, InMemoryShipmentStorage, InMemoryShippingMethodStorage,
    InMemoryStoreStorage, OrderStorage, ShipmentStorage,
};

#[actix::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,marketplace_orders=debug")),
        )
        .init();

    tracing::info!("Starting marketplace order splitting demo");

    let config = AppConfig::from_env()?;

    // === 1. Initialize Prometheus metrics ===
    let app_metrics = Arc::new(metrics::Metrics::new()?);

    // Start metrics HTTP server in background thread
    let metrics_registry = Arc::new(app_metrics.registry().clone());
    let metrics_port = config.metrics_port;
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("metrics runtime");
        rt.block_on(async {
            if let Err(e) = metrics::start_metrics_server(metrics_registry, metrics_port).await {
                tracing::error!("Metrics server error: {}", e);
            }
        });
    });

    // === 2. In-memory storage backends ===
    let orders = Arc::new(InMemoryOrderStorage::new());
    let order_items = Arc::new(InMemoryOrderItemStorage::new());
    let shipments = Arc::new(InMemoryShipmentStorage::new());
    let order_types = Arc::new(InMemoryOrderTypeStorage::new());
    let products = Arc::new(InMemoryProductStorage::new());
    let stores = Arc::new(InMemoryStoreStorage::new());
    let shipping_methods = Arc::new(InMemoryShippingMethodStorage::new());

    // === 3. Seed stores, order types, catalog ===
    let marketplace = Store::new("Marketplace");
    let acme = Store::new("Acme Outdoors");
    let north = Store::new("North Books");
    stores.insert_default(marketplace.clone()).await;
    stores.insert(acme.clone()).await;
    stores.insert(north.clone()).await;

    order_types
        .insert(OrderType {
            id: config.marketplace_order_type.clone(),
            label: "Marketplace order".to_string(),
            has_marketplace_reference: false,
            number_pattern: None,
        })
        .await;
    order_types
        .insert(OrderType {
            id: config.default_order_type.clone(),
            label: "Store order".to_string(),
            has_marketplace_reference: true,
            number_pattern: Some("sequential".to_string()),
        })
        .await;

    let tent = Product::new(
        "Trekking tent",
        vec![acme.id],
        Money::new(Decimal::from(240), &config.currency),
    )
    .with_weight(Weight::new(Decimal::new(35, 1), WeightUnit::Kilogram));
    let atlas = Product::new(
        "Mountain atlas",
        vec![north.id],
        Money::new(Decimal::from(45), &config.currency),
    )
    .with_weight(Weight::new(Decimal::from(800), WeightUnit::Gram));
    let ebook = Product::new(
        "Trail guide (e-book)",
        vec![north.id],
        Money::new(Decimal::from(12), &config.currency),
    );
    products.insert(tent.clone()).await;
    products.insert(atlas.clone()).await;
    products.insert(ebook.clone()).await;

    shipping_methods
        .insert(ShippingMethod::new("Standard post", vec![acme.id]).with_weight(5))
        .await;
    shipping_methods
        .insert(
            ShippingMethod::new("Free courier", vec![acme.id])
                .with_condition(MethodCondition::MinDeclaredValue(Money::new(
                    Decimal::from(100),
                    &config.currency,
                ))),
        )
        .await;
    shipping_methods
        .insert(ShippingMethod::new("Letter mail", vec![north.id]))
        .await;

    // === 4. Wire the splitting service ===
    let cart_provider = CartProvider::new(orders.clone());
    let cart_manager = CartManager::new(orders.clone(), order_items.clone());
    let grouper = ItemGrouper::new(
        order_items.clone(),
        products.clone(),
        StoreSelector::new(stores.clone()),
        Arc::new(DefaultOrderTypeResolver::new(config.default_order_type.clone())),
    );
    let price_resolver = Arc::new(ChainPriceResolver::new(vec![Arc::new(ListPriceResolver)]));
    let number_patterns = Arc::new(
        NumberPatternRegistry::new()
            .register("sequential", Arc::new(SequentialNumberPattern::new("MP"))),
    );
    let service = Arc::new(MarketplaceOrderService::new(
        orders.clone(),
        order_items.clone(),
        shipments.clone(),
        order_types.clone(),
        products.clone(),
        stores.clone(),
        grouper,
        cart_provider.clone(),
        cart_manager.clone(),
        price_resolver,
        number_patterns,
    ));

    // === 5. Start the order-placed subscriber ===
    let subscriber = OrderPlacedSubscriber::new(
        orders.clone(),
        service.clone(),
        config.marketplace_order_type.clone(),
        app_metrics.clone(),
    )
    .start();

    // === 6. A customer fills the marketplace cart ===
    let customer_id = uuid::Uuid::new_v4();
    let add_to_cart = MarketplaceAddToCart::new(
        cart_provider.clone(),
        cart_manager.clone(),
        stores.clone(),
        config.marketplace_order_type.clone(),
    );
    add_to_cart
        .add_item(customer_id, &tent, Decimal::ONE, true)
        .await?;
    add_to_cart
        .add_item(customer_id, &atlas, Decimal::from(2), true)
        .await?;
    let (cart, _) = add_to_cart
        .add_item(customer_id, &ebook, Decimal::ONE, true)
        .await?;

    tracing::info!(order_id = %cart.id, items = cart.item_ids.len(), "Marketplace cart filled");

    // === 7. Checkout: pack shipments per store, then place the order ===
    let mut order = orders
        .load(cart.id)
        .await?
        .expect("cart order should exist");
    order.billing_profile_id = Some(uuid::Uuid::new_v4());

    let shipping_profile_id = uuid::Uuid::new_v4();
    let packer = StorePacker::new(order_items.clone(), products.clone(), stores.clone())
        .with_metrics(app_metrics.clone());
    for proposed in packer.pack(&order, shipping_profile_id).await? {
        let shipment = Shipment::from_proposed(order.id, &proposed);
        tracing::info!(
            shipment_id = %shipment.id,
            title = %shipment.title,
            "Packed shipment"
        );
        shipments.save(&shipment).await?;
        order.shipment_ids.push(shipment.id);
    }

    order.cart = false;
    order.state = OrderState::Placed;
    order.placed_at = Some(Utc::now());
    orders.save(&order).await?;
    tracing::info!(order_id = %order.id, "Marketplace order placed");

    // === 8. The placement event triggers the split ===
    let sub_order_ids = subscriber
        .send(OrderPlaced {
            order_id: order.id,
            current_store_id: marketplace.id,
            current_user_id: customer_id,
        })
        .await??;

    tracing::info!(count = sub_order_ids.len(), "Sub-orders created");

    // === 9. Inspect the result ===
    let method_loader = StoreMethodLoader::new(shipping_methods.clone());
    for sub_order in orders.find_by_marketplace_ref(order.id).await? {
        tracing::info!(
            sub_order_id = %sub_order.id,
            number = %sub_order.number.as_deref().unwrap_or("-"),
            store_id = %sub_order.store_id,
            state = ?sub_order.state,
            items = sub_order.item_ids.len(),
            shipments = sub_order.shipment_ids.len(),
            refresh_on_save = sub_order.refresh_on_save,
            "Sub-order"
        );

        for shipment in shipments.load_many(&sub_order.shipment_ids).await? {
            let methods = method_loader.load_for_shipment(&shipment).await?;
            let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
            tracing::info!(
                shipment_id = %shipment.id,
                methods = ?names,
                "Shipping methods available"
            );
        }
    }

    tracing::info!("Demo complete");

    Ok(())
}

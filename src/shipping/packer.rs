use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::domain::order::Order;
use crate::domain::shipment::{ProposedShipment, ShipmentItem, SHIPMENT_STORE_ID_KEY};
use crate::metrics::Metrics;
use crate::storage::{OrderItemStorage, ProductStorage, StoreStorage};

// ============================================================================
// Store Packer - One Proposed Shipment Per Store
// ============================================================================

/// Packs an order's shippable items into one proposed shipment per store.
///
/// Non-physical products (no weight attribute) and dangling product
/// references are skipped. The store fallback here is deliberately the
/// simple rule (first listed store, default store when the product lists
/// none), not the current-store disambiguation used when splitting.
pub struct StorePacker {
    order_items: Arc<dyn OrderItemStorage>,
    products: Arc<dyn ProductStorage>,
    stores: Arc<dyn StoreStorage>,
    metrics: Option<Arc<Metrics>>,
}

impl StorePacker {
    pub fn new(
        order_items: Arc<dyn OrderItemStorage>,
        products: Arc<dyn ProductStorage>,
        stores: Arc<dyn StoreStorage>,
    ) -> Self {
        Self {
            order_items,
            products,
            stores,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn pack(
        &self,
        order: &Order,
        shipping_profile_id: Uuid,
    ) -> Result<Vec<ProposedShipment>> {
        let items = self.order_items.load_many(&order.item_ids).await?;

        let mut grouped: IndexMap<Uuid, Vec<ShipmentItem>> = IndexMap::new();
        let mut store_labels: HashMap<Uuid, String> = HashMap::new();

        for item in items {
            let Some(product) = self.products.load(item.purchased_entity_id).await? else {
                continue;
            };
            // Non-physical goods carry no weight attribute and are not packed.
            let Some(unit_weight) = product.weight.clone() else {
                continue;
            };

            let store = match product.store_ids.first() {
                Some(store_id) => self.stores.load(*store_id).await?.ok_or_else(|| {
                    anyhow!(
                        "store {} referenced by product {} does not exist",
                        store_id,
                        product.id
                    )
                })?,
                None => self
                    .stores
                    .load_default()
                    .await?
                    .ok_or_else(|| anyhow!("no default store configured"))?,
            };

            store_labels.insert(store.id, store.name.clone());
            grouped.entry(store.id).or_default().push(ShipmentItem {
                order_item_id: item.id,
                title: item.title.clone(),
                quantity: item.quantity,
                weight: unit_weight.multiply(item.quantity),
                declared_value: item.unit_price.multiply(item.quantity),
            });
        }

        let mut proposed = Vec::with_capacity(grouped.len());
        for (store_id, shipment_items) in grouped {
            let store_name = &store_labels[&store_id];
            let mut custom_fields = HashMap::new();
            custom_fields.insert(SHIPMENT_STORE_ID_KEY.to_string(), store_id.to_string());

            if let Some(metrics) = &self.metrics {
                metrics.record_packed(store_name, shipment_items.len());
            }
            tracing::debug!(
                order_id = %order.id,
                store_id = %store_id,
                item_count = shipment_items.len(),
                "Proposing shipment for store"
            );

            proposed.push(ProposedShipment {
                order_id: order.id,
                title: format!("Shipment from {}", store_name),
                items: shipment_items,
                shipping_profile_id,
                custom_fields,
            });
        }

        Ok(proposed)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

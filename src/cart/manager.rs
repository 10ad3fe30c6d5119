use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::order::{Order, OrderItem};
use crate::domain::product::Product;
use crate::storage::{OrderItemStorage, OrderStorage};

// ============================================================================
// Cart Manager
// ============================================================================

/// Builds line items and attaches them to cart orders.
#[derive(Clone)]
pub struct CartManager {
    orders: Arc<dyn OrderStorage>,
    order_items: Arc<dyn OrderItemStorage>,
}

impl CartManager {
    pub fn new(orders: Arc<dyn OrderStorage>, order_items: Arc<dyn OrderItemStorage>) -> Self {
        Self {
            orders,
            order_items,
        }
    }

    /// A fresh, unattached line item for the product at the given
    /// quantity, priced from the product's list price. Duplication during
    /// splitting starts from this and re-resolves the price as needed.
    pub fn create_order_item(&self, product: &Product, quantity: Decimal) -> OrderItem {
        OrderItem::for_product(product, quantity)
    }

    /// Attaches a line item to a cart. With `combine`, an existing line
    /// item for the same purchasable entity absorbs the quantity instead
    /// of a second line appearing.
    pub async fn add_order_item(
        &self,
        cart: &mut Order,
        item: OrderItem,
        combine: bool,
    ) -> Result<OrderItem> {
        if combine {
            let existing = self.order_items.load_many(&cart.item_ids).await?;
            if let Some(mut matched) = existing
                .into_iter()
                .find(|e| e.purchased_entity_id == item.purchased_entity_id)
            {
                matched.quantity += item.quantity;
                self.order_items.save(&matched).await?;
                cart.updated_at = Utc::now();
                self.orders.save(cart).await?;
                return Ok(matched);
            }
        }

        let mut item = item;
        item.order_id = Some(cart.id);
        self.order_items.save(&item).await?;
        cart.item_ids.push(item.id);
        cart.updated_at = Utc::now();
        self.orders.save(cart).await?;
        Ok(item)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

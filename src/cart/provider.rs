use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::order::Order;
use crate::storage::OrderStorage;

// ============================================================================
// Cart Provider
// ============================================================================

/// Locates, creates and finalizes cart orders.
///
/// There is at most one cart per (order type, store, customer).
#[derive(Clone)]
pub struct CartProvider {
    orders: Arc<dyn OrderStorage>,
}

impl CartProvider {
    pub fn new(orders: Arc<dyn OrderStorage>) -> Self {
        Self { orders }
    }

    pub async fn get_cart(
        &self,
        order_type: &str,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Order>> {
        self.orders.find_cart(order_type, store_id, customer_id).await
    }

    /// Creates and persists a fresh cart order.
    pub async fn create_cart(
        &self,
        order_type: &str,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Order> {
        let cart = Order::new_cart(order_type, store_id, customer_id);
        self.orders.save(&cart).await?;
        tracing::debug!(
            order_id = %cart.id,
            order_type = %order_type,
            store_id = %store_id,
            "Created cart order"
        );
        Ok(cart)
    }

    /// Transitions a cart into an ordinary order: the cart flag is
    /// cleared and the order persisted. The workflow state is left
    /// untouched; placement is the caller's transition.
    pub async fn finalize_cart(&self, cart: &mut Order) -> Result<()> {
        cart.cart = false;
        cart.updated_at = Utc::now();
        self.orders.save(cart).await?;
        tracing::debug!(order_id = %cart.id, "Finalized cart order");
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

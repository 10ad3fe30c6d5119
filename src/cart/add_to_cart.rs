use std::sync::Arc;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem};
use crate::domain::product::Product;
use crate::storage::StoreStorage;

use super::manager::CartManager;
use super::provider::CartProvider;

// ============================================================================
// Marketplace Add-To-Cart
// ============================================================================

/// The storefront add-to-cart behavior for marketplace installations.
///
/// Regardless of which store lists the product, every add lands on the
/// customer's single marketplace-typed cart on the default store; the
/// per-store split happens only after placement.
pub struct MarketplaceAddToCart {
    provider: CartProvider,
    manager: CartManager,
    stores: Arc<dyn StoreStorage>,
    marketplace_order_type: String,
}

impl MarketplaceAddToCart {
    pub fn new(
        provider: CartProvider,
        manager: CartManager,
        stores: Arc<dyn StoreStorage>,
        marketplace_order_type: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            manager,
            stores,
            marketplace_order_type: marketplace_order_type.into(),
        }
    }

    /// Get-or-create the marketplace cart and add the product to it.
    /// Returns the cart and the attached (possibly combined) line item.
    pub async fn add_item(
        &self,
        customer_id: Uuid,
        product: &Product,
        quantity: Decimal,
        combine: bool,
    ) -> Result<(Order, OrderItem)> {
        let store = self
            .stores
            .load_default()
            .await?
            .ok_or_else(|| anyhow!("no default store configured"))?;

        let mut cart = match self
            .provider
            .get_cart(&self.marketplace_order_type, store.id, customer_id)
            .await?
        {
            Some(cart) => cart,
            None => {
                self.provider
                    .create_cart(&self.marketplace_order_type, store.id, customer_id)
                    .await?
            }
        };

        let item = self.manager.create_order_item(product, quantity);
        let item = self.manager.add_order_item(&mut cart, item, combine).await?;

        tracing::info!(
            order_id = %cart.id,
            product_id = %product.id,
            quantity = %quantity,
            "Added product to marketplace cart"
        );

        Ok((cart, item))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::Money;
use crate::domain::product::Product;

// ============================================================================
// Order Item - Line Item Entity
// ============================================================================

/// A purchasable entity at a quantity and unit price on one order.
///
/// `unit_price_overridden` records that the price was set explicitly
/// (e.g. by an admin adjustment); overridden prices survive duplication
/// onto sub-orders without being re-resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub purchased_entity_id: Uuid,
    pub title: String,
    pub quantity: Decimal,
    pub unit_price: Money,
    pub unit_price_overridden: bool,
}

impl OrderItem {
    /// A fresh, unattached line item priced from the product's list price.
    pub fn for_product(product: &Product, quantity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: None,
            purchased_entity_id: product.id,
            title: product.title.clone(),
            quantity,
            unit_price: product.price.clone(),
            unit_price_overridden: false,
        }
    }

    /// Explicitly pin the unit price, exempting it from price resolution.
    pub fn override_unit_price(&mut self, price: Money) {
        self.unit_price = price;
        self.unit_price_overridden = true;
    }

    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product::new("Tent", vec![Uuid::new_v4()], Money::new(dec!(120), "USD"))
    }

    #[test]
    fn test_for_product_takes_list_price() {
        let product = product();
        let item = OrderItem::for_product(&product, dec!(2));
        assert_eq!(item.purchased_entity_id, product.id);
        assert_eq!(item.unit_price, product.price);
        assert!(!item.unit_price_overridden);
        assert!(item.order_id.is_none());
    }

    #[test]
    fn test_override_unit_price_sets_flag() {
        let mut item = OrderItem::for_product(&product(), dec!(1));
        item.override_unit_price(Money::new(dec!(99), "USD"));
        assert!(item.unit_price_overridden);
        assert_eq!(item.unit_price.amount, dec!(99));
    }

    #[test]
    fn test_total_price() {
        let item = OrderItem::for_product(&product(), dec!(3));
        assert_eq!(item.total_price(), Money::new(dec!(360), "USD"));
    }
}

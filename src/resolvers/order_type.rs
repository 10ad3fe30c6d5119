use crate::domain::order::OrderItem;

// ============================================================================
// Order Type Resolution
// ============================================================================

/// Resolves the order type a line item belongs on.
///
/// Grouping asks this per line item so different purchasable entity kinds
/// can land on differently configured sub-order types.
#[cfg_attr(test, mockall::automock)]
pub trait OrderTypeResolver: Send + Sync {
    fn resolve(&self, item: &OrderItem) -> String;
}

/// Resolves every line item to a single configured order type.
pub struct DefaultOrderTypeResolver {
    order_type: String,
}

impl DefaultOrderTypeResolver {
    pub fn new(order_type: impl Into<String>) -> Self {
        Self {
            order_type: order_type.into(),
        }
    }
}

impl OrderTypeResolver for DefaultOrderTypeResolver {
    fn resolve(&self, _item: &OrderItem) -> String {
        self.order_type.clone()
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
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_default_resolver_returns_configured_type() {
        let resolver = DefaultOrderTypeResolver::new("default");
        let product = Product::new("Tent", vec![Uuid::new_v4()], Money::new(dec!(1), "USD"));
        let item = OrderItem::for_product(&product, dec!(1));
        assert_eq!(resolver.resolve(&item), "default");
    }
}

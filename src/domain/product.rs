use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use super::physical::Weight;

// ============================================================================
// Product - Purchasable Entity
// ============================================================================

/// A purchasable entity listed in one or more stores.
///
/// `store_ids` must be non-empty for the product to be sellable; an empty
/// list is a catalog configuration error that surfaces when the product is
/// ordered. `weight` is `None` for non-physical goods, which are skipped
/// by shipment packing entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub store_ids: Vec<Uuid>,
    pub price: Money,
    pub weight: Option<Weight>,
}

impl Product {
    pub fn new(title: impl Into<String>, store_ids: Vec<Uuid>, price: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            store_ids,
            price,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_defaults_to_non_physical() {
        let product = Product::new("E-book", vec![Uuid::new_v4()], Money::new(dec!(9.99), "USD"));
        assert!(product.weight.is_none());
    }

    #[test]
    fn test_with_weight_marks_product_physical() {
        let product = Product::new("Tent", vec![Uuid::new_v4()], Money::new(dec!(99), "USD"))
            .with_weight(Weight::new(dec!(3.5), crate::domain::WeightUnit::Kilogram));
        assert!(product.weight.is_some());
    }
}

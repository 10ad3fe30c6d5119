use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::Money;
use crate::domain::physical::Weight;
use crate::domain::shipment::Shipment;

// ============================================================================
// Shipping Method Entity
// ============================================================================

/// An applicability rule evaluated against a shipment.
///
/// The fixed set of conditions replaces runtime-discovered condition
/// plugins; new rules are added here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodCondition {
    /// The shipment's total weight must not exceed the limit.
    MaxTotalWeight(Weight),
    /// The shipment's declared value must reach the minimum, in the
    /// minimum's currency.
    MinDeclaredValue(Money),
}

impl MethodCondition {
    fn evaluate(&self, shipment: &Shipment) -> bool {
        match self {
            MethodCondition::MaxTotalWeight(limit) => shipment.total_weight() <= *limit,
            MethodCondition::MinDeclaredValue(min) => match shipment.total_declared_value() {
                Some(total) if total.currency == min.currency => total.amount >= min.amount,
                _ => false,
            },
        }
    }
}

/// A shipping method registered for one or more stores.
///
/// `weight` is the canonical sort key (lower first, ties broken by name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: Uuid,
    pub name: String,
    pub store_ids: Vec<Uuid>,
    pub status: bool,
    pub weight: i32,
    pub conditions: Vec<MethodCondition>,
}

impl ShippingMethod {
    pub fn new(name: impl Into<String>, store_ids: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            store_ids,
            status: true,
            weight: 0,
            conditions: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_condition(mut self, condition: MethodCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// All conditions must hold for the method to apply.
    pub fn applies(&self, shipment: &Shipment) -> bool {
        self.conditions.iter().all(|c| c.evaluate(shipment))
    }
}

/// Canonical ordering: sort key, then name.
pub fn sort_methods(methods: &mut [ShippingMethod]) {
    methods.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.name.cmp(&b.name)));
}

// ============================================================================
// Unit Tests
// ============================================================================

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use super::physical::Weight;

// ============================================================================
// Shipments
// ============================================================================

/// Data-bag key under which the packer records the producing store.
pub const SHIPMENT_STORE_ID_KEY: &str = "store_id";

/// One packed line item inside a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentItem {
    pub order_item_id: Uuid,
    pub title: String,
    pub quantity: Decimal,
    pub weight: Weight,
    pub declared_value: Money,
}

/// A persisted shipment attached to an order.
///
/// The `data` bag carries free-form metadata; store-aware packing records
/// the producing store under [`SHIPMENT_STORE_ID_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub title: String,
    pub items: Vec<ShipmentItem>,
    pub data: HashMap<String, String>,
}

impl Shipment {
    /// Materialize a proposed shipment into a persisted one.
    pub fn from_proposed(order_id: Uuid, proposed: &ProposedShipment) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            title: proposed.title.clone(),
            items: proposed.items.clone(),
            data: proposed.custom_fields.clone(),
        }
    }

    /// Clone this shipment under a fresh identity.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy
    }

    /// The store recorded in the data bag, if any.
    pub fn store_id(&self) -> Option<Uuid> {
        self.data
            .get(SHIPMENT_STORE_ID_KEY)
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }

    pub fn total_weight(&self) -> Weight {
        total_weight(&self.items)
    }

    pub fn total_declared_value(&self) -> Option<Money> {
        total_declared_value(&self.items)
    }
}

/// A shipment proposal produced by a packer, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedShipment {
    pub order_id: Uuid,
    pub title: String,
    pub items: Vec<ShipmentItem>,
    pub shipping_profile_id: Uuid,
    pub custom_fields: HashMap<String, String>,
}

impl ProposedShipment {
    pub fn store_id(&self) -> Option<Uuid> {
        self.custom_fields
            .get(SHIPMENT_STORE_ID_KEY)
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }

    pub fn total_weight(&self) -> Weight {
        total_weight(&self.items)
    }

    pub fn total_declared_value(&self) -> Option<Money> {
        total_declared_value(&self.items)
    }
}

fn total_weight(items: &[ShipmentItem]) -> Weight {
    items
        .iter()
        .fold(Weight::zero(), |acc, item| acc.add(&item.weight))
}

/// `None` for an empty item list or mixed currencies.
fn total_declared_value(items: &[ShipmentItem]) -> Option<Money> {
    let mut iter = items.iter();
    let first = iter.next()?.declared_value.clone();
    iter.try_fold(first, |acc, item| acc.checked_add(&item.declared_value))
}

// ============================================================================
// Unit Tests
// ============================================================================

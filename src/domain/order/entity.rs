use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::OrderState;

// ============================================================================
// Order Entity
// ============================================================================

/// A purchase record.
///
/// Line items and shipments are separate entities referenced by id; the
/// order owns the reference lists. `marketplace_ref` is the single scalar
/// back-reference from a sub-order to the marketplace order it was split
/// from; the parent keeps no reverse collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_type: String,
    pub number: Option<String>,
    pub store_id: Uuid,
    pub customer_id: Uuid,
    pub state: OrderState,
    pub cart: bool,
    pub billing_profile_id: Option<Uuid>,
    pub item_ids: Vec<Uuid>,
    pub shipment_ids: Vec<Uuid>,
    pub marketplace_ref: Option<Uuid>,
    pub refresh_on_save: bool,

    // Audit Trail
    pub placed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A fresh cart-flagged draft order.
    pub fn new_cart(order_type: impl Into<String>, store_id: Uuid, customer_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_type: order_type.into(),
            number: None,
            store_id,
            customer_id,
            state: OrderState::Draft,
            cart: true,
            billing_profile_id: None,
            item_ids: Vec::new(),
            shipment_ids: Vec::new(),
            marketplace_ref: None,
            refresh_on_save: false,
            placed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The timestamp price resolution runs against: the placement time
    /// once placed, otherwise the creation time.
    pub fn calculation_date(&self) -> DateTime<Utc> {
        self.placed_at.unwrap_or(self.created_at)
    }
}

// ============================================================================
// Order Type Configuration
// ============================================================================

/// Per-bundle order configuration.
///
/// `has_marketplace_reference` says whether orders of this type carry the
/// `marketplace_ref` field; a sub-order type without it is a setup error
/// caught during splitting. `number_pattern` names the registered number
/// generator, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderType {
    pub id: String,
    pub label: String,
    pub has_marketplace_reference: bool,
    pub number_pattern: Option<String>,
}

// ============================================================================
// Unit Tests
// ============================================================================

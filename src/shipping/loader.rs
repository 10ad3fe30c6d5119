use std::sync::Arc;

use anyhow::Result;

use crate::domain::shipment::Shipment;
use crate::storage::ShippingMethodStorage;

use super::method::{sort_methods, ShippingMethod};

// ============================================================================
// Store-Scoped Shipping Method Loading
// ============================================================================

/// Hook allowing external code to prune or extend the candidate method
/// list before applicability is evaluated. Implementations are registered
/// on the loader at startup.
pub trait ShippingMethodFilter: Send + Sync {
    fn filter(&self, methods: Vec<ShippingMethod>, shipment: &Shipment) -> Vec<ShippingMethod>;
}

/// Loads the shipping methods applicable to a shipment, restricted to the
/// store recorded on the shipment by the packer.
pub struct StoreMethodLoader {
    methods: Arc<dyn ShippingMethodStorage>,
    filters: Vec<Arc<dyn ShippingMethodFilter>>,
}

impl StoreMethodLoader {
    pub fn new(methods: Arc<dyn ShippingMethodStorage>) -> Self {
        Self {
            methods,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Arc<dyn ShippingMethodFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Active methods registered for the shipment's store, filtered,
    /// applicability-checked and canonically ordered. Empty when the
    /// shipment carries no store tag or the store has no methods.
    pub async fn load_for_shipment(&self, shipment: &Shipment) -> Result<Vec<ShippingMethod>> {
        let Some(store_id) = shipment.store_id() else {
            tracing::warn!(
                shipment_id = %shipment.id,
                "Shipment carries no store tag, no shipping methods available"
            );
            return Ok(Vec::new());
        };

        let mut methods = self.methods.load_active_for_store(store_id).await?;
        if methods.is_empty() {
            return Ok(Vec::new());
        }

        for filter in &self.filters {
            methods = filter.filter(methods, shipment);
        }

        methods.retain(|method| method.applies(shipment));
        sort_methods(&mut methods);

        tracing::debug!(
            shipment_id = %shipment.id,
            store_id = %store_id,
            method_count = methods.len(),
            "Loaded shipping methods for shipment"
        );

        Ok(methods)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

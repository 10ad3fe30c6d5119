use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::domain::product::Product;
use crate::domain::store::Store;
use crate::storage::StoreStorage;

use super::errors::SplitError;

// ============================================================================
// Store Selector
// ============================================================================

/// Resolves which store a purchasable entity is sold from.
///
/// A single-store product sells from that store. A multi-store product
/// sells from the caller's current store; if the current store is not
/// among the candidates, the storefront listings were not filtered
/// properly and the selection fails. A product with no store at all is a
/// malformed catalog entry.
pub struct StoreSelector {
    stores: Arc<dyn StoreStorage>,
}

impl StoreSelector {
    pub fn new(stores: Arc<dyn StoreStorage>) -> Self {
        Self { stores }
    }

    pub async fn select(&self, product: &Product, current_store_id: Uuid) -> Result<Store> {
        let store_id = match product.store_ids.as_slice() {
            [] => return Err(SplitError::ProductNotInAnyStore(product.id).into()),
            [only] => *only,
            candidates => {
                if !candidates.contains(&current_store_id) {
                    return Err(SplitError::NotSellableFromCurrentStore(product.id).into());
                }
                current_store_id
            }
        };

        self.stores
            .load(store_id)
            .await?
            .ok_or_else(|| SplitError::MissingStore(store_id).into())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

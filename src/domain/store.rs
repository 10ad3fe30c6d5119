use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Store Entity
// ============================================================================

/// An independent seller storefront.
///
/// One store in the installation is the default store; the cart and
/// packing fallbacks resolve to it when a product declares no store of
/// its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
}

impl Store {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

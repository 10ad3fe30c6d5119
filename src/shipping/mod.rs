// ============================================================================
// Shipping - Store-Aware Packing and Method Selection
// ============================================================================
//
// Keeps checkout shipping store-scoped:
// - StorePacker proposes one shipment per store
// - StoreMethodLoader restricts candidate methods to the shipment's store,
//   runs registered filter hooks, then applicability and ordering
//
// ============================================================================

pub mod loader;
pub mod method;
pub mod packer;

pub use loader::{ShippingMethodFilter, StoreMethodLoader};
pub use method::{MethodCondition, ShippingMethod};
pub use packer::StorePacker;

// ============================================================================
// Domain Layer - Entities and Value Objects
// ============================================================================
//
// This module contains the commerce entities the splitting logic operates on:
// - Primitive value objects (Money, Weight)
// - Stores and purchasable products
// - Orders, order types and line items
// - Shipments (persisted and proposed)
//
// Persistence and orchestration live elsewhere; this layer is plain data
// plus the arithmetic the entities themselves own.
//
// ============================================================================

pub mod money;
pub mod order;
pub mod physical;
pub mod product;
pub mod shipment;
pub mod store;

pub use money::Money;
pub use physical::{Weight, WeightUnit};
pub use product::Product;
pub use shipment::{ProposedShipment, Shipment, ShipmentItem, SHIPMENT_STORE_ID_KEY};
pub use store::Store;

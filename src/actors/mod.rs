// ============================================================================
// Actors - Workflow Event Subscribers
// ============================================================================
//
// The order lifecycle reaches this crate through messages: placing a
// marketplace order fires `OrderPlaced`, which the subscriber turns into
// a split invocation.
//
// ============================================================================

mod order_placed;

pub use order_placed::{OrderPlaced, OrderPlacedSubscriber};

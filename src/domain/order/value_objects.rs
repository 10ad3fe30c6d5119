use serde::{Deserialize, Serialize};

// ============================================================================
// Order Value Objects
// ============================================================================

/// Workflow state of an order.
///
/// Sub-orders copy the parent's state verbatim during splitting, so the
/// same set of states covers both the marketplace order and its
/// per-store sub-orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    Draft,
    Placed,
    Completed,
    Canceled,
}

impl OrderState {
    /// Whether splitting may run against an order in this state.
    pub fn is_placed(&self) -> bool {
        matches!(self, OrderState::Placed | OrderState::Completed)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

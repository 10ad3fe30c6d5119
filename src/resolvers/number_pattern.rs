use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::order::Order;

// ============================================================================
// Order Number Patterns
// ============================================================================

/// Generates a customer-facing order number for an order.
///
/// Patterns are registered by id in the [`NumberPatternRegistry`]; order
/// types reference them through `OrderType::number_pattern`.
pub trait NumberPattern: Send + Sync {
    fn generate(&self, order: &Order) -> String;
}

/// Prefixed monotonically increasing numbers, e.g. `MP-000042`.
pub struct SequentialNumberPattern {
    prefix: String,
    next: AtomicU64,
}

impl SequentialNumberPattern {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl NumberPattern for SequentialNumberPattern {
    fn generate(&self, _order: &Order) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:06}", self.prefix, n)
    }
}

/// The number patterns known at startup.
#[derive(Default)]
pub struct NumberPatternRegistry {
    patterns: HashMap<String, Arc<dyn NumberPattern>>,
}

impl NumberPatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, id: impl Into<String>, pattern: Arc<dyn NumberPattern>) -> Self {
        self.patterns.insert(id.into(), pattern);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn NumberPattern>> {
        self.patterns.get(id)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

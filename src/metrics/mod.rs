// Private module declaration
mod server;

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Marketplace order splitting (throughput, duration, failures)
// - Per-store sub-order creation
// - Store-aware shipment packing
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Splitting Metrics
    pub orders_split_total: IntCounter,
    pub split_failures_total: IntCounterVec,
    pub split_duration_seconds: Histogram,
    pub sub_orders_created_total: IntCounterVec,

    // Packing Metrics
    pub shipments_packed_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_split_total = IntCounter::new(
            "orders_split_total",
            "Total marketplace orders split into sub-orders",
        )?;
        registry.register(Box::new(orders_split_total.clone()))?;

        let split_failures_total = IntCounterVec::new(
            Opts::new("split_failures_total", "Total failed split attempts"),
            &["reason"],
        )?;
        registry.register(Box::new(split_failures_total.clone()))?;

        let split_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("split_duration_seconds", "Marketplace order split duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(split_duration_seconds.clone()))?;

        let sub_orders_created_total = IntCounterVec::new(
            Opts::new("sub_orders_created_total", "Sub-orders created, by store"),
            &["store"],
        )?;
        registry.register(Box::new(sub_orders_created_total.clone()))?;

        let shipments_packed_total = IntCounterVec::new(
            Opts::new(
                "shipments_packed_total",
                "Proposed shipments produced by the store packer, by store",
            ),
            &["store"],
        )?;
        registry.register(Box::new(shipments_packed_total.clone()))?;

        Ok(Self {
            registry,
            orders_split_total,
            split_failures_total,
            split_duration_seconds,
            sub_orders_created_total,
            shipments_packed_total,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record a completed split
    pub fn record_split(&self, store_names: &[&str], duration_secs: f64) {
        self.orders_split_total.inc();
        self.split_duration_seconds.observe(duration_secs);
        for store in store_names {
            self.sub_orders_created_total.with_label_values(&[store]).inc();
        }
    }

    /// Helper to record a failed split attempt
    pub fn record_split_failure(&self, reason: &str) {
        self.split_failures_total.with_label_values(&[reason]).inc();
    }

    /// Helper to record a proposed shipment
    pub fn record_packed(&self, store: &str, _item_count: usize) {
        self.shipments_packed_total.with_label_values(&[store]).inc();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_record_split() {
        let metrics = Metrics::new().unwrap();
        metrics.record_split(&["Acme Outdoors", "North Books"], 0.02);

        let gathered = metrics.registry.gather();
        let split = gathered
            .iter()
            .find(|m| m.name() == "orders_split_total")
            .unwrap();
        assert_eq!(split.metric[0].counter.value, Some(1.0));

        let created = gathered
            .iter()
            .find(|m| m.name() == "sub_orders_created_total")
            .unwrap();
        assert_eq!(created.metric.len(), 2); // Two store labels
    }

    #[test]
    fn test_record_split_failure() {
        let metrics = Metrics::new().unwrap();
        metrics.record_split_failure("configuration");
        metrics.record_split_failure("configuration");

        let gathered = metrics.registry.gather();
        let failures = gathered
            .iter()
            .find(|m| m.name() == "split_failures_total")
            .unwrap();
        assert_eq!(failures.metric[0].counter.value, Some(2.0));
    }

    #[test]
    fn test_record_packed() {
        let metrics = Metrics::new().unwrap();
        metrics.record_packed("Acme Outdoors", 3);

        let gathered = metrics.registry.gather();
        let packed = gathered
            .iter()
            .find(|m| m.name() == "shipments_packed_total")
            .unwrap();
        assert_eq!(packed.metric[0].counter.value, Some(1.0));
    }
}

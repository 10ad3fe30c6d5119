use std::env;

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Order type of the customer-facing marketplace aggregate.
    pub marketplace_order_type: String,
    /// Order type sub-orders are created as.
    pub default_order_type: String,
    /// Currency prices are quoted in.
    pub currency: String,
    pub metrics_port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            marketplace_order_type: env::var("MARKETPLACE_ORDER_TYPE")
                .unwrap_or_else(|_| "marketplace".into()),
            default_order_type: env::var("DEFAULT_ORDER_TYPE").unwrap_or_else(|_| "default".into()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "USD".into()),
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".into())
                .parse()?,
        })
    }
}

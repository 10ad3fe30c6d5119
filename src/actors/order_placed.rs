use actix::prelude::*;
use anyhow::bail;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::metrics::Metrics;
use crate::splitting::{MarketplaceOrderService, SplitContext, SplitError};
use crate::storage::OrderStorage;

// ============================================================================
// Actor Messages
// ============================================================================

/// The workflow-transition event: an order moved to "placed".
///
/// The acting store and user travel with the event instead of being read
/// from ambient request state.
#[derive(Message)]
#[rtype(result = "anyhow::Result<Vec<Uuid>>")]
pub struct OrderPlaced {
    pub order_id: Uuid,
    pub current_store_id: Uuid,
    pub current_user_id: Uuid,
}

// ============================================================================
// Order Placed Subscriber - Triggers the marketplace split
// ============================================================================

/// Subscribes to order placement and splits marketplace orders into
/// per-store sub-orders. Orders of any other type are ignored.
pub struct OrderPlacedSubscriber {
    orders: Arc<dyn OrderStorage>,
    service: Arc<MarketplaceOrderService>,
    marketplace_order_type: String,
    metrics: Arc<Metrics>,
}

impl OrderPlacedSubscriber {
    pub fn new(
        orders: Arc<dyn OrderStorage>,
        service: Arc<MarketplaceOrderService>,
        marketplace_order_type: impl Into<String>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            orders,
            service,
            marketplace_order_type: marketplace_order_type.into(),
            metrics,
        }
    }
}

impl Actor for OrderPlacedSubscriber {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("OrderPlacedSubscriber started");
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl Handler<OrderPlaced> for OrderPlacedSubscriber {
    type Result = ResponseFuture<anyhow::Result<Vec<Uuid>>>;

    fn handle(&mut self, msg: OrderPlaced, _: &mut Self::Context) -> Self::Result {
        let orders = self.orders.clone();
        let service = self.service.clone();
        let marketplace_order_type = self.marketplace_order_type.clone();
        let metrics = self.metrics.clone();

        Box::pin(async move {
            let Some(order) = orders.load(msg.order_id).await? else {
                bail!("order {} does not exist", msg.order_id);
            };

            if order.order_type != marketplace_order_type {
                tracing::debug!(
                    order_id = %order.id,
                    order_type = %order.order_type,
                    "Not a marketplace order, skipping split"
                );
                return Ok(Vec::new());
            }

            tracing::info!(order_id = %order.id, "Marketplace order placed, splitting");

            let started = Instant::now();
            let ctx = SplitContext {
                current_store_id: msg.current_store_id,
                current_user_id: msg.current_user_id,
            };

            match service.create_sub_orders(&order, &ctx).await {
                Ok(sub_orders) => {
                    let store_names: Vec<&str> = sub_orders.keys().map(|s| s.as_str()).collect();
                    metrics.record_split(&store_names, started.elapsed().as_secs_f64());
                    Ok(sub_orders.values().map(|o| o.id).collect())
                }
                Err(e) => {
                    let reason = if e.downcast_ref::<SplitError>().is_some() {
                        "configuration"
                    } else {
                        "other"
                    };
                    metrics.record_split_failure(reason);
                    Err(e)
                }
            }
        })
    }
}

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::money::Money;
use crate::domain::product::Product;

// ============================================================================
// Price Resolution Chain
// ============================================================================

/// The context a price is resolved against: who is buying, from which
/// store, and as of when.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceContext {
    pub customer_id: Uuid,
    pub store_id: Uuid,
    pub calculated_at: DateTime<Utc>,
}

/// One link of the price resolution chain. Returning `Ok(None)` passes
/// the product to the next resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceResolver: Send + Sync {
    async fn resolve(
        &self,
        product: &Product,
        quantity: Decimal,
        context: &PriceContext,
    ) -> Result<Option<Money>>;
}

/// Runs registered resolvers in order; the first price wins. Falls back
/// to the product's list price when no resolver answers.
pub struct ChainPriceResolver {
    resolvers: Vec<Arc<dyn PriceResolver>>,
}

impl ChainPriceResolver {
    pub fn new(resolvers: Vec<Arc<dyn PriceResolver>>) -> Self {
        Self { resolvers }
    }

    pub async fn resolve(
        &self,
        product: &Product,
        quantity: Decimal,
        context: &PriceContext,
    ) -> Result<Money> {
        for resolver in &self.resolvers {
            if let Some(price) = resolver.resolve(product, quantity, context).await? {
                return Ok(price);
            }
        }
        Ok(product.price.clone())
    }
}

/// Terminal resolver answering with the product's list price.
pub struct ListPriceResolver;

#[async_trait]
impl PriceResolver for ListPriceResolver {
    async fn resolve(
        &self,
        product: &Product,
        _quantity: Decimal,
        _context: &PriceContext,
    ) -> Result<Option<Money>> {
        Ok(Some(product.price.clone()))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

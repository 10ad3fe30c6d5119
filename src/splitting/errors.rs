use uuid::Uuid;

// ============================================================================
// Splitting Business Rule Errors
// ============================================================================
//
// All of these are configuration problems in the catalog or order-type
// setup. The split aborts on the first one; there is no recovery path.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("product {0} is not assigned to any store")]
    ProductNotInAnyStore(Uuid),

    #[error("product {0} can't be purchased from the current store")]
    NotSellableFromCurrentStore(Uuid),

    #[error("store {0} does not exist")]
    MissingStore(Uuid),

    #[error("no default store configured")]
    NoDefaultStore,

    #[error("order item {0} references a missing product")]
    MissingProduct(Uuid),

    #[error("order type {0} does not exist")]
    UnknownOrderType(String),

    #[error("order type {0} does not carry the marketplace order reference field")]
    MissingMarketplaceReference(String),
}

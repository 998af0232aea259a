use std::time::Duration;
use thiserror::Error;

use crate::model::{GenericError, ProductId};

/// Failures that abort a whole assessment.
///
/// Individual evaluator failures never surface here; they fail open.
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("order has no lines")]
    EmptyOrder,

    #[error("order line for product {product_id} has zero quantity")]
    ZeroQuantity { product_id: ProductId },

    #[error("order line for product {product_id} has invalid unit price {unit_price}")]
    InvalidUnitPrice { product_id: ProductId, unit_price: f64 },

    #[error("assessment timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("failed to fetch orders for statistics window: {0}")]
    Fetch(#[source] GenericError),

    #[error("statistics window of {0} days reaches before the earliest representable time")]
    WindowOutOfRange(u32),

    #[error("statistics run was cancelled")]
    Cancelled,

    #[error("statistics run timed out after {0:?}")]
    TimedOut(Duration),
}

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Timelike, Utc};
use std::collections::HashMap;
use tracing::warn;

use crate::{
    model::{
        FactorScore, GenericError, OrderCandidate, OrderLine, ProductFacts, RiskFactor, RiskFlag,
    },
    scorers::Scorer,
    snapshot::SnapshotReader,
};

pub const BUSINESS_HOURS_START: u32 = 6;
pub const BUSINESS_HOURS_END: u32 = 22;
pub const UNUSUAL_TIME_POINTS: i32 = 10;
pub const BULK_QUANTITY_LIMIT: u64 = 10;
pub const BULK_QUANTITY_POINTS: i32 = 15;
pub const HIGH_VALUE_PRODUCT_PRICE: f64 = 10_000.0;
pub const NEW_USER_ORDER_COUNT: usize = 3;
pub const HIGH_VALUE_NEW_USER_POINTS: i32 = 20;

/// Order timing, bulk quantities, and expensive items bought by new customers.
pub struct PatternScorer {
    offset: FixedOffset,
}

impl PatternScorer {
    pub fn new(utc_offset_hours: i32) -> Self {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(utc_offset_hours, "Invalid UTC offset, falling back to UTC");
                Utc.fix()
            });
        Self { offset }
    }
}

pub fn is_unusual_hour(hour: u32) -> bool {
    !(BUSINESS_HOURS_START..BUSINESS_HOURS_END).contains(&hour)
}

/// Quantity is summed per product across lines before the limit applies.
pub fn has_bulk_quantity(lines: &[OrderLine]) -> bool {
    let mut per_product: HashMap<&str, u64> = HashMap::new();
    for line in lines {
        *per_product.entry(line.product_id.as_str()).or_default() += u64::from(line.quantity);
    }
    per_product.values().any(|&quantity| quantity > BULK_QUANTITY_LIMIT)
}

pub fn has_high_value_product(products: &[ProductFacts]) -> bool {
    products.iter().any(|p| p.price > HIGH_VALUE_PRODUCT_PRICE)
}

/// `order_history_count` is only read when a high-value product is present.
pub fn score_pattern(
    local_hour: u32,
    lines: &[OrderLine],
    products: &[ProductFacts],
    order_history_count: usize,
) -> FactorScore {
    let mut result = FactorScore::neutral(RiskFactor::Pattern);

    if is_unusual_hour(local_hour) {
        result.flag(UNUSUAL_TIME_POINTS, RiskFlag::UnusualOrderTime);
    }

    if has_bulk_quantity(lines) {
        result.flag(BULK_QUANTITY_POINTS, RiskFlag::BulkQuantityOrder);
    }

    if has_high_value_product(products) && order_history_count < NEW_USER_ORDER_COUNT {
        result.flag(HIGH_VALUE_NEW_USER_POINTS, RiskFlag::HighValueItemsNewUser);
    }

    result
}

#[async_trait]
impl Scorer for PatternScorer {
    fn factor(&self) -> RiskFactor {
        RiskFactor::Pattern
    }

    async fn score(
        &self,
        order: &OrderCandidate,
        snapshot: &SnapshotReader<'_>,
    ) -> Result<FactorScore, GenericError> {
        let local_hour = order
            .created_at_or(snapshot.now())
            .with_timezone(&self.offset)
            .hour();

        let products = snapshot.product_facts().await?;
        let order_history_count = if has_high_value_product(&products) {
            snapshot.all_orders().await?.len()
        } else {
            0
        };

        Ok(score_pattern(
            local_hour,
            &order.lines,
            &products,
            order_history_count,
        ))
    }
}

use async_trait::async_trait;

use crate::{
    model::{FactorScore, GenericError, OrderCandidate, OrderRecord, RiskFactor, RiskFlag},
    scorers::Scorer,
    snapshot::SnapshotReader,
};

pub const HIGH_AMOUNT_THRESHOLD: f64 = 50_000.0;
pub const HIGH_AMOUNT_POINTS: i32 = 30;
pub const ROUND_AMOUNT_UNIT: f64 = 1_000.0;
pub const ROUND_AMOUNT_POINTS: i32 = 15;
pub const AMOUNT_INCREASE_MULTIPLIER: f64 = 3.0;
pub const AMOUNT_INCREASE_POINTS: i32 = 20;

/// Flags large, suspiciously round, or out-of-character order totals.
pub struct AmountScorer;

/// All three checks are independent and additive.
pub fn score_amount(total: f64, recent_orders: &[OrderRecord]) -> FactorScore {
    let mut result = FactorScore::neutral(RiskFactor::Amount);

    if total > HIGH_AMOUNT_THRESHOLD {
        result.flag(HIGH_AMOUNT_POINTS, RiskFlag::UnusuallyHighAmount);
    }

    if total > ROUND_AMOUNT_UNIT && total % ROUND_AMOUNT_UNIT == 0.0 {
        result.flag(ROUND_AMOUNT_POINTS, RiskFlag::RoundNumberAmount);
    }

    if !recent_orders.is_empty() {
        let average = recent_orders.iter().map(OrderRecord::total_amount).sum::<f64>()
            / recent_orders.len() as f64;
        if total > average * AMOUNT_INCREASE_MULTIPLIER {
            result.flag(AMOUNT_INCREASE_POINTS, RiskFlag::SignificantAmountIncrease);
        }
    }

    result
}

#[async_trait]
impl Scorer for AmountScorer {
    fn factor(&self) -> RiskFactor {
        RiskFactor::Amount
    }

    async fn score(
        &self,
        order: &OrderCandidate,
        snapshot: &SnapshotReader<'_>,
    ) -> Result<FactorScore, GenericError> {
        let recent_orders = snapshot.recent_orders().await?;
        Ok(score_amount(order.total_amount(), &recent_orders))
    }
}

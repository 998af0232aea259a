use async_trait::async_trait;
use std::collections::HashSet;

use crate::{
    model::{
        FactorScore, GenericError, OrderCandidate, OrderRecord, PaymentMethod, RiskFactor,
        RiskFlag,
    },
    scorers::Scorer,
    snapshot::SnapshotReader,
};

pub const MPESA_ADJUSTMENT: i32 = -10;
pub const DISTINCT_METHOD_LIMIT: usize = 2;
pub const UNUSUAL_METHOD_POINTS: i32 = 10;

pub struct PaymentMethodScorer;

/// M-Pesa lowers the score; the result may go negative and is not clamped.
pub fn score_payment_method(method: PaymentMethod, prior_orders: &[OrderRecord]) -> FactorScore {
    let mut result = FactorScore::neutral(RiskFactor::PaymentMethod);

    if method == PaymentMethod::Mpesa {
        result.adjust(MPESA_ADJUSTMENT);
    }

    let used: HashSet<PaymentMethod> = prior_orders.iter().map(|o| o.payment_method).collect();
    if used.len() > DISTINCT_METHOD_LIMIT && !used.contains(&method) {
        result.flag(UNUSUAL_METHOD_POINTS, RiskFlag::UnusualPaymentMethod);
    }

    result
}

#[async_trait]
impl Scorer for PaymentMethodScorer {
    fn factor(&self) -> RiskFactor {
        RiskFactor::PaymentMethod
    }

    async fn score(
        &self,
        order: &OrderCandidate,
        snapshot: &SnapshotReader<'_>,
    ) -> Result<FactorScore, GenericError> {
        let prior_orders = snapshot.prior_orders().await?;
        Ok(score_payment_method(order.payment_method, &prior_orders))
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::{
    model::{CustomerHistory, FactorScore, GenericError, OrderCandidate, RiskFactor, RiskFlag},
    scorers::Scorer,
    snapshot::SnapshotReader,
};

pub const NEW_ACCOUNT_DAYS: i64 = 7;
pub const NEW_ACCOUNT_POINTS: i32 = 25;
pub const SHORT_WINDOW_ORDER_LIMIT: usize = 3;
pub const SHORT_WINDOW_POINTS: i32 = 20;
pub const RECENT_CANCELLATION_LIMIT: usize = 2;
pub const RECENT_CANCELLATION_POINTS: i32 = 15;

/// Account age and order velocity.
pub struct BehaviorScorer;

pub fn score_behavior(history: &CustomerHistory, now: DateTime<Utc>) -> FactorScore {
    let mut result = FactorScore::neutral(RiskFactor::Behavior);

    // Order value is not consulted despite the flag name.
    if let Some(created_at) = history.account_created_at {
        if now - created_at < Duration::days(NEW_ACCOUNT_DAYS) {
            result.flag(NEW_ACCOUNT_POINTS, RiskFlag::NewAccountHighValueOrder);
        }
    }

    if history.orders_last_24h.len() > SHORT_WINDOW_ORDER_LIMIT {
        result.flag(SHORT_WINDOW_POINTS, RiskFlag::MultipleOrdersShortTime);
    }

    if history.cancelled_last_7d.len() > RECENT_CANCELLATION_LIMIT {
        result.flag(RECENT_CANCELLATION_POINTS, RiskFlag::RecentFailedPayments);
    }

    result
}

#[async_trait]
impl Scorer for BehaviorScorer {
    fn factor(&self) -> RiskFactor {
        RiskFactor::Behavior
    }

    async fn score(
        &self,
        _order: &OrderCandidate,
        snapshot: &SnapshotReader<'_>,
    ) -> Result<FactorScore, GenericError> {
        let history = snapshot.customer_history().await?;
        Ok(score_behavior(&history, snapshot.now()))
    }
}

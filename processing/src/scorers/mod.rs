pub mod address;
pub mod amount;
pub mod behavior;
pub mod pattern;
pub mod payment_method;

pub use address::*;
pub use amount::*;
pub use behavior::*;
pub use pattern::*;
pub use payment_method::*;

use async_trait::async_trait;
use common::config::AssessorConfig;

use crate::{
    model::{FactorScore, GenericError, OrderCandidate, RiskFactor},
    snapshot::SnapshotReader,
};

/// One independent risk heuristic.
///
/// An `Err` means the scorer could not read what it needed; the processor
/// treats it as a neutral contribution.
#[async_trait]
pub trait Scorer: Send + Sync {
    fn factor(&self) -> RiskFactor;

    async fn score(
        &self,
        order: &OrderCandidate,
        snapshot: &SnapshotReader<'_>,
    ) -> Result<FactorScore, GenericError>;
}

/// The five production scorers, in aggregation order.
pub fn default_scorers(config: &AssessorConfig) -> Vec<Box<dyn Scorer>> {
    vec![
        Box::new(AmountScorer),
        Box::new(BehaviorScorer),
        Box::new(AddressScorer::new(config.home_country.clone())),
        Box::new(PaymentMethodScorer),
        Box::new(PatternScorer::new(config.utc_offset_hours)),
    ]
}

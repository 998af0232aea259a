use chrono::{DateTime, Utc};
use common::config::{AssessorConfig, StatisticsConfig};
use futures::future::join_all;
use metrics::{counter, histogram};
use std::{collections::BTreeSet, sync::Arc, time::Instant};
use tracing::{debug, warn};

use crate::{
    error::AssessmentError,
    model::{FactorScore, OrderCandidate, RiskAssessment, RiskLevel},
    recommendations::generate_recommendations,
    scorers::{Scorer, default_scorers},
    snapshot::SnapshotReader,
    storage::{OrderStore, ProductStore, UserStore},
};

/// Order fraud-risk engine.
///
/// Holds only store handles, scorers and configuration; every call is
/// independent. Both [`RiskEngine::assess`] and the statistics run go
/// through [`RiskEngine::try_assess_at`], so live gating and reporting
/// cannot drift apart.
pub struct RiskEngine {
    pub(crate) assessor_config: AssessorConfig,
    pub(crate) statistics_config: StatisticsConfig,
    scorers: Vec<Box<dyn Scorer>>,
    pub(crate) orders: Arc<dyn OrderStore>,
    users: Arc<dyn UserStore>,
    products: Arc<dyn ProductStore>,
}

impl RiskEngine {
    pub fn new(
        assessor_config: AssessorConfig,
        statistics_config: StatisticsConfig,
        orders: Arc<dyn OrderStore>,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        let scorers = default_scorers(&assessor_config);
        Self::new_raw(
            assessor_config,
            statistics_config,
            scorers,
            orders,
            users,
            products,
        )
    }

    /// Engine with an explicit scorer set.
    pub fn new_raw(
        assessor_config: AssessorConfig,
        statistics_config: StatisticsConfig,
        scorers: Vec<Box<dyn Scorer>>,
        orders: Arc<dyn OrderStore>,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        Self {
            assessor_config,
            statistics_config,
            scorers,
            orders,
            users,
            products,
        }
    }

    /// Scores one order. Never fails: any pipeline error yields the `unknown` assessment.
    pub async fn assess(&self, order: &OrderCandidate) -> RiskAssessment {
        self.assess_at(order, Utc::now()).await
    }

    pub async fn assess_at(&self, order: &OrderCandidate, now: DateTime<Utc>) -> RiskAssessment {
        match self.try_assess_at(order, now).await {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!(
                    error = %e,
                    customer_id = %order.customer_id,
                    order_id = ?order.order_id,
                    "Risk analysis failed, returning degraded assessment"
                );
                counter!("order_risk_assessments_total", "level" => RiskLevel::Unknown.to_string())
                    .increment(1);
                RiskAssessment::analysis_error()
            }
        }
    }

    pub async fn try_assess(&self, order: &OrderCandidate) -> Result<RiskAssessment, AssessmentError> {
        self.try_assess_at(order, Utc::now()).await
    }

    pub async fn try_assess_at(
        &self,
        order: &OrderCandidate,
        now: DateTime<Utc>,
    ) -> Result<RiskAssessment, AssessmentError> {
        order.validate()?;

        let t0 = Instant::now();
        let factors = match self.assessor_config.assessment_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.run_scorers(order, now))
                .await
                .map_err(|_| AssessmentError::TimedOut(limit))?,
            None => self.run_scorers(order, now).await,
        };

        let assessment = build_assessment(factors);
        histogram!("order_risk_assessment_seconds").record(t0.elapsed().as_secs_f64());
        counter!("order_risk_assessments_total", "level" => assessment.level.to_string())
            .increment(1);

        debug!(
            customer_id = %order.customer_id,
            order_id = ?order.order_id,
            score = assessment.score,
            level = %assessment.level,
            flags = ?assessment.flags,
            "Order assessed"
        );
        Ok(assessment)
    }

    /// Runs every scorer concurrently; a failed scorer contributes a neutral score.
    async fn run_scorers(&self, order: &OrderCandidate, now: DateTime<Utc>) -> Vec<FactorScore> {
        let snapshot = SnapshotReader::new(
            self.orders.as_ref(),
            self.users.as_ref(),
            self.products.as_ref(),
            order,
            now,
        );

        let results = join_all(
            self.scorers
                .iter()
                .map(|scorer| scorer.score(order, &snapshot)),
        )
        .await;

        self.scorers
            .iter()
            .zip(results)
            .map(|(scorer, result)| match result {
                Ok(score) => score,
                Err(e) => {
                    warn!(
                        error = %e,
                        factor = %scorer.factor(),
                        customer_id = %order.customer_id,
                        "Scorer lookup failed, contributing neutral score"
                    );
                    counter!("order_risk_evaluator_failures_total", "factor" => scorer.factor().to_string())
                        .increment(1);
                    FactorScore::neutral(scorer.factor())
                }
            })
            .collect()
    }
}

/// Sum of partial scores; no floor or ceiling.
pub fn composite_score(factors: &[FactorScore]) -> i32 {
    factors.iter().map(|f| f.score).sum()
}

/// Aggregates factor scores, classifies and attaches recommendations.
pub fn build_assessment(factors: Vec<FactorScore>) -> RiskAssessment {
    let score = composite_score(&factors);
    let flags: BTreeSet<_> = factors
        .iter()
        .flat_map(|f| f.flags.iter().copied())
        .collect();

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        recommendations: generate_recommendations(score, &flags),
        flags,
        factors,
    }
}

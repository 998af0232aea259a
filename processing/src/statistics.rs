use chrono::{DateTime, Duration, Utc};
use futures::{StreamExt, stream};
use metrics::histogram;
use std::{future::Future, time::Instant};
use tracing::{info, warn};

use crate::{
    error::StatisticsError,
    model::{FraudStatistics, RiskLevel},
    processor::RiskEngine,
};

/// Per-tier counts for one statistics run. Merging is a plain sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelTally {
    pub analyzed: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl LevelTally {
    /// Tally of a single assessment.
    pub fn of(level: RiskLevel) -> LevelTally {
        let mut tally = LevelTally {
            analyzed: 1,
            ..Default::default()
        };
        match level {
            RiskLevel::High => tally.high = 1,
            RiskLevel::Medium => tally.medium = 1,
            RiskLevel::Low => tally.low = 1,
            RiskLevel::VeryLow => {}
            // Degraded assessments are not analyzed orders.
            RiskLevel::Unknown => tally.analyzed = 0,
        }
        tally
    }

    pub fn merge(self, other: LevelTally) -> LevelTally {
        LevelTally {
            analyzed: self.analyzed + other.analyzed,
            high: self.high + other.high,
            medium: self.medium + other.medium,
            low: self.low + other.low,
        }
    }

    pub fn into_statistics(self, total_orders: usize) -> FraudStatistics {
        FraudStatistics {
            total_orders,
            analyzed_orders: self.analyzed,
            high_risk_orders: self.high,
            medium_risk_orders: self.medium,
            low_risk_orders: self.low,
            fraud_rate: fraud_rate(self.high + self.medium, self.analyzed),
        }
    }
}

/// Percentage with two decimals; zero when nothing was analyzed.
pub fn fraud_rate(risky: usize, analyzed: usize) -> f64 {
    if analyzed == 0 {
        return 0.0;
    }
    let rate = risky as f64 / analyzed as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Start of the trailing window, or `None` when it predates `DateTime`'s range.
pub fn window_start(now: DateTime<Utc>, window_days: u32) -> Option<DateTime<Utc>> {
    Duration::try_days(i64::from(window_days)).and_then(|window| now.checked_sub_signed(window))
}

impl RiskEngine {
    /// Statistics over the configured default window.
    pub async fn get_default_statistics(&self) -> FraudStatistics {
        self.get_statistics(self.statistics_config.default_window_days)
            .await
    }

    /// Re-scores every order of the trailing window. Never fails: errors,
    /// cancellation and timeouts all yield zero-filled statistics.
    pub async fn get_statistics(&self, window_days: u32) -> FraudStatistics {
        let now = Utc::now();
        let result = match self.statistics_config.timeout() {
            Some(limit) => {
                self.statistics_until(window_days, now, tokio::time::sleep(limit))
                    .await
                    .map_err(|e| match e {
                        StatisticsError::Cancelled => StatisticsError::TimedOut(limit),
                        other => other,
                    })
            }
            None => {
                self.statistics_until(window_days, now, std::future::pending::<()>())
                    .await
            }
        };

        result.unwrap_or_else(|e| {
            warn!(error = %e, window_days, "Statistics run failed, returning empty statistics");
            FraudStatistics::empty()
        })
    }

    /// Runs the window through the assessment pipeline with bounded concurrency.
    ///
    /// If `cancel` completes first, in-flight assessments are dropped and
    /// `StatisticsError::Cancelled` is returned.
    pub async fn statistics_until<F>(
        &self,
        window_days: u32,
        now: DateTime<Utc>,
        cancel: F,
    ) -> Result<FraudStatistics, StatisticsError>
    where
        F: Future<Output = ()>,
    {
        let t0 = Instant::now();
        let run = async {
            let since = window_start(now, window_days)
                .ok_or(StatisticsError::WindowOutOfRange(window_days))?;
            let orders = self
                .orders
                .find_recent_global(since)
                .await
                .map_err(StatisticsError::Fetch)?;
            let total_orders = orders.len();

            let tally = stream::iter(orders)
                .map(|record| async move {
                    let candidate = record.to_candidate();
                    self.assess_at(&candidate, now).await.level
                })
                .buffer_unordered(self.statistics_config.max_concurrency.max(1))
                .fold(LevelTally::default(), |tally, level| async move {
                    tally.merge(LevelTally::of(level))
                })
                .await;

            Ok::<_, StatisticsError>(tally.into_statistics(total_orders))
        };

        let statistics = tokio::select! {
            result = run => result?,
            _ = cancel => return Err(StatisticsError::Cancelled),
        };

        histogram!("order_risk_statistics_seconds").record(t0.elapsed().as_secs_f64());
        info!(
            window_days,
            total_orders = statistics.total_orders,
            analyzed_orders = statistics.analyzed_orders,
            high_risk_orders = statistics.high_risk_orders,
            medium_risk_orders = statistics.medium_risk_orders,
            fraud_rate = statistics.fraud_rate,
            "Fraud statistics computed"
        );
        Ok(statistics)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display as EnumDisplay, EnumIter};

pub const HIGH_RISK_THRESHOLD: i32 = 70;
pub const MEDIUM_RISK_THRESHOLD: i32 = 40;
pub const LOW_RISK_THRESHOLD: i32 = 20;

pub const ANALYSIS_ERROR_RECOMMENDATION: &str = "Manual review required due to analysis error";

/// Discrete risk tier derived from the composite score.
///
/// `Unknown` is never produced by classification; it marks an assessment that
/// could not be completed and must go to human review.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDisplay, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= HIGH_RISK_THRESHOLD => RiskLevel::High,
            s if s >= MEDIUM_RISK_THRESHOLD => RiskLevel::Medium,
            s if s >= LOW_RISK_THRESHOLD => RiskLevel::Low,
            _ => RiskLevel::VeryLow,
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Unknown)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumDisplay,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskFlag {
    UnusuallyHighAmount,
    RoundNumberAmount,
    SignificantAmountIncrease,
    /// Raised for any account younger than a week, whatever the order value.
    NewAccountHighValueOrder,
    MultipleOrdersShortTime,
    RecentFailedPayments,
    MultipleShippingAddresses,
    InternationalShippingNewUser,
    UnusualPaymentMethod,
    UnusualOrderTime,
    BulkQuantityOrder,
    HighValueItemsNewUser,
    AnalysisError,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDisplay, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskFactor {
    Amount,
    Behavior,
    Address,
    PaymentMethod,
    Pattern,
}

/// Partial score and flags contributed by a single evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: RiskFactor,
    pub score: i32,
    pub flags: Vec<RiskFlag>,
}

impl FactorScore {
    /// Zero score, no flags.
    pub fn neutral(factor: RiskFactor) -> Self {
        Self {
            factor,
            score: 0,
            flags: Vec::new(),
        }
    }

    pub fn flag(&mut self, points: i32, flag: RiskFlag) {
        self.score += points;
        self.flags.push(flag);
    }

    pub fn adjust(&mut self, points: i32) {
        self.score += points;
    }

    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.flags.contains(&flag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: i32,
    pub level: RiskLevel,
    pub flags: BTreeSet<RiskFlag>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<FactorScore>,
}

impl RiskAssessment {
    /// Degraded result returned when the pipeline itself fails.
    pub fn analysis_error() -> Self {
        Self {
            score: 0,
            level: RiskLevel::Unknown,
            flags: BTreeSet::from([RiskFlag::AnalysisError]),
            recommendations: vec![ANALYSIS_ERROR_RECOMMENDATION.to_string()],
            factors: Vec::new(),
        }
    }

    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.flags.contains(&flag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudStatistics {
    pub total_orders: usize,
    pub analyzed_orders: usize,
    pub high_risk_orders: usize,
    pub medium_risk_orders: usize,
    pub low_risk_orders: usize,
    /// Percentage of analyzed orders at medium or high risk, two decimals.
    pub fraud_rate: f64,
}

impl FraudStatistics {
    pub fn empty() -> Self {
        Self::default()
    }
}

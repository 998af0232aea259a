use std::collections::BTreeSet;

use crate::model::{HIGH_RISK_THRESHOLD, LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD, RiskFlag};

const HIGH_RISK_ACTIONS: [&str; 3] = [
    "Require additional verification (ID document or phone confirmation)",
    "Consider manual review before fulfillment",
    "Monitor this order closely",
];

const MEDIUM_RISK_ACTIONS: [&str; 2] = [
    "Send additional verification email",
    "Consider calling customer for confirmation",
];

const LOW_RISK_ACTIONS: [&str; 2] = [
    "Monitor order progress",
    "Flag for potential review if issues arise",
];

const FLAG_ACTIONS: [(RiskFlag, &str); 3] = [
    (RiskFlag::NewAccountHighValueOrder, "Verify account legitimacy"),
    (RiskFlag::MultipleOrdersShortTime, "Check for account compromise"),
    (
        RiskFlag::InternationalShippingNewUser,
        "Verify shipping address and identity",
    ),
];

/// Tier actions first, then one action per specific flag, in a fixed order.
///
/// Entries are not deduplicated.
pub fn generate_recommendations(score: i32, flags: &BTreeSet<RiskFlag>) -> Vec<String> {
    let tier_actions: &[&str] = if score >= HIGH_RISK_THRESHOLD {
        &HIGH_RISK_ACTIONS
    } else if score >= MEDIUM_RISK_THRESHOLD {
        &MEDIUM_RISK_ACTIONS
    } else if score >= LOW_RISK_THRESHOLD {
        &LOW_RISK_ACTIONS
    } else {
        &[]
    };

    tier_actions
        .iter()
        .copied()
        .chain(
            FLAG_ACTIONS
                .iter()
                .filter(|(flag, _)| flags.contains(flag))
                .map(|(_, action)| *action),
        )
        .map(str::to_string)
        .collect()
}

use chrono::{Duration, TimeZone, Utc};
use common::{TestResult, test_assert, test_assert_eq};
use std::sync::Arc;

use processing::{
    error::AssessmentError,
    model::*,
    storage::InMemoryStorage,
};

use crate::mocks::{address, candidate, engine_over, fixed_now, line, past_order, user};

#[tokio::test]
async fn test_first_big_order_from_new_account_is_medium() {
    // The television is not in the catalog, so the pattern evaluator stays quiet.
    let storage = Arc::new(InMemoryStorage::with_data(
        vec![user("amina", Duration::days(2))],
        vec![],
        vec![],
    ));
    let engine = engine_over(storage);
    let order = candidate("amina", vec![line("p-tv", 60_000.0, 1)], PaymentMethod::Mpesa);

    let assessment = engine.assess_at(&order, fixed_now()).await;

    assert_eq!(assessment.score, 60);
    assert_eq!(assessment.level, RiskLevel::Medium);
    assert!(assessment.has_flag(RiskFlag::UnusuallyHighAmount));
    assert!(assessment.has_flag(RiskFlag::RoundNumberAmount));
    assert!(assessment.has_flag(RiskFlag::NewAccountHighValueOrder));
    assert_eq!(assessment.flags.len(), 3);
    assert_eq!(
        assessment.recommendations,
        vec![
            "Send additional verification email".to_string(),
            "Consider calling customer for confirmation".to_string(),
            "Verify account legitimacy".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_known_high_value_product_pushes_new_customer_to_high() {
    let storage = Arc::new(InMemoryStorage::with_data(
        vec![user("amina", Duration::days(2))],
        vec![ProductFacts {
            product_id: "p-tv".to_string(),
            price: 60_000.0,
        }],
        vec![],
    ));
    let engine = engine_over(storage);
    let order = candidate("amina", vec![line("p-tv", 60_000.0, 1)], PaymentMethod::Mpesa);

    let assessment = engine.assess_at(&order, fixed_now()).await;

    assert_eq!(assessment.score, 80);
    assert_eq!(assessment.level, RiskLevel::High);
    assert!(assessment.level.needs_review());
    assert!(assessment.has_flag(RiskFlag::HighValueItemsNewUser));
    assert_eq!(assessment.recommendations.len(), 4);
    assert_eq!(
        assessment.recommendations[0],
        "Require additional verification (ID document or phone confirmation)"
    );
}

#[tokio::test]
async fn test_loyal_mpesa_customer_is_very_low() {
    let history = (1..=5)
        .map(|week| {
            past_order(
                &format!("ord-{week}"),
                "baraka",
                1_500.0,
                PaymentMethod::Mpesa,
                fixed_now() - Duration::weeks(week),
            )
        })
        .collect();
    let storage = Arc::new(InMemoryStorage::with_data(
        vec![user("baraka", Duration::days(3 * 365))],
        vec![],
        history,
    ));
    let engine = engine_over(storage);
    let order = candidate("baraka", vec![line("p-rice", 1_000.0, 2)], PaymentMethod::Mpesa);

    let assessment = engine.assess_at(&order, fixed_now()).await;

    // Only the round total fires; M-Pesa takes ten off.
    assert_eq!(assessment.score, 5);
    assert_eq!(assessment.level, RiskLevel::VeryLow);
    assert_eq!(
        assessment.flags.iter().copied().collect::<Vec<_>>(),
        vec![RiskFlag::RoundNumberAmount]
    );
    assert!(assessment.recommendations.is_empty());
}

#[tokio::test]
async fn test_mpesa_discount_applied_once() -> TestResult<()> {
    let storage = Arc::new(InMemoryStorage::with_data(
        vec![user("amina", Duration::days(2))],
        vec![],
        vec![],
    ));
    let engine = engine_over(storage);
    let order = candidate("amina", vec![line("p-tv", 60_000.0, 1)], PaymentMethod::Mpesa);

    let assessment = engine.assess_at(&order, fixed_now()).await;

    let payment: Vec<_> = assessment
        .factors
        .iter()
        .filter(|f| f.factor == RiskFactor::PaymentMethod)
        .collect();
    test_assert_eq!(assessment.factors.len(), 5);
    test_assert_eq!(payment.len(), 1);
    test_assert_eq!(payment[0].score, -10);
    test_assert!(payment[0].flags.is_empty(), "discount carries no flag");
    Ok(())
}

#[tokio::test]
async fn test_persisted_order_is_excluded_from_its_own_history() {
    let now = fixed_now();
    let mut orders: Vec<OrderRecord> = (1..=3)
        .map(|hour| {
            past_order(
                &format!("ord-{hour}"),
                "cheng",
                700.0,
                PaymentMethod::Card,
                now - Duration::hours(hour),
            )
        })
        .collect();
    let current = past_order("ord-current", "cheng", 650.0, PaymentMethod::Card, now);
    orders.push(current.clone());

    let storage = Arc::new(InMemoryStorage::with_data(
        vec![user("cheng", Duration::days(400))],
        vec![],
        orders,
    ));
    let engine = engine_over(storage);

    // Three other orders in the last day is at the limit, not over it.
    let rescored = engine.assess_at(&current.to_candidate(), now).await;
    assert!(!rescored.has_flag(RiskFlag::MultipleOrdersShortTime));
    assert_eq!(rescored.level, RiskLevel::VeryLow);

    // A fresh order sees all four stored ones.
    let fresh = candidate("cheng", vec![line("p-tea", 650.0, 1)], PaymentMethod::Card);
    let assessment = engine.assess_at(&fresh, now).await;
    assert!(assessment.has_flag(RiskFlag::MultipleOrdersShortTime));
    assert_eq!(assessment.score, 20);
    assert_eq!(assessment.level, RiskLevel::Low);
    assert_eq!(
        assessment.recommendations.last().map(String::as_str),
        Some("Check for account compromise")
    );
}

#[tokio::test]
async fn test_first_order_shipped_abroad_is_flagged() {
    let engine = engine_over(Arc::new(InMemoryStorage::new()));
    let mut order = candidate("dmitri", vec![line("p-phone", 9_500.0, 1)], PaymentMethod::Card);
    order.shipping_address = Some(address("Uhuru Road 4", "Tanzania"));

    let assessment = engine.assess_at(&order, fixed_now()).await;

    assert_eq!(assessment.score, 20);
    assert!(assessment.has_flag(RiskFlag::InternationalShippingNewUser));
    assert_eq!(
        assessment.recommendations,
        vec![
            "Monitor order progress".to_string(),
            "Flag for potential review if issues arise".to_string(),
            "Verify shipping address and identity".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_home_country_match_ignores_case_and_padding() {
    let engine = engine_over(Arc::new(InMemoryStorage::new()));
    let mut order = candidate("dmitri", vec![line("p-phone", 9_500.0, 1)], PaymentMethod::Card);
    order.shipping_address = Some(address("Kenyatta Avenue 2", " kenya "));

    let assessment = engine.assess_at(&order, fixed_now()).await;

    assert!(!assessment.has_flag(RiskFlag::InternationalShippingNewUser));
    assert_eq!(assessment.score, 0);
}

#[tokio::test]
async fn test_order_time_read_in_local_hours() {
    let engine = engine_over(Arc::new(InMemoryStorage::new()));
    let mut order = candidate("esi", vec![line("p-book", 800.0, 1)], PaymentMethod::Card);

    // 22:30 UTC is 01:30 at +3.
    order.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 15, 22, 30, 0).unwrap());
    let night = engine.assess_at(&order, fixed_now()).await;
    assert!(night.has_flag(RiskFlag::UnusualOrderTime));
    assert_eq!(night.score, 10);

    // 03:00 UTC is 06:00 at +3, the first business hour.
    order.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 15, 3, 0, 0).unwrap());
    let morning = engine.assess_at(&order, fixed_now()).await;
    assert!(!morning.has_flag(RiskFlag::UnusualOrderTime));
}

#[tokio::test]
async fn test_missing_creation_time_uses_evaluation_time() {
    let engine = engine_over(Arc::new(InMemoryStorage::new()));
    let mut order = candidate("esi", vec![line("p-book", 800.0, 1)], PaymentMethod::Card);
    order.created_at = None;

    let late = Utc.with_ymd_and_hms(2024, 6, 15, 20, 0, 0).unwrap();
    let assessment = engine.assess_at(&order, late).await;

    assert!(assessment.has_flag(RiskFlag::UnusualOrderTime));
}

#[tokio::test]
async fn test_bulk_quantity_across_lines() {
    let engine = engine_over(Arc::new(InMemoryStorage::new()));
    let order = candidate(
        "fatma",
        vec![line("p-soap", 120.5, 6), line("p-soap", 120.5, 5)],
        PaymentMethod::CashOnDelivery,
    );

    let assessment = engine.assess_at(&order, fixed_now()).await;

    assert!(assessment.has_flag(RiskFlag::BulkQuantityOrder));
    assert_eq!(assessment.score, 15);
    assert_eq!(assessment.level, RiskLevel::VeryLow);
}

#[tokio::test]
async fn test_invalid_order_yields_unknown_assessment() {
    let engine = engine_over(Arc::new(InMemoryStorage::new()));

    let empty = candidate("gus", vec![], PaymentMethod::Card);
    let assessment = engine.assess_at(&empty, fixed_now()).await;
    assert_eq!(assessment, RiskAssessment::analysis_error());
    assert_eq!(assessment.level, RiskLevel::Unknown);
    assert_eq!(
        assessment.recommendations,
        vec![ANALYSIS_ERROR_RECOMMENDATION.to_string()]
    );
    assert!(matches!(
        engine.try_assess_at(&empty, fixed_now()).await,
        Err(AssessmentError::EmptyOrder)
    ));

    let zero = candidate("gus", vec![line("p-pen", 50.0, 0)], PaymentMethod::Card);
    assert!(matches!(
        engine.try_assess_at(&zero, fixed_now()).await,
        Err(AssessmentError::ZeroQuantity { .. })
    ));

    let negative = candidate("gus", vec![line("p-pen", -1.0, 1)], PaymentMethod::Card);
    assert!(matches!(
        engine.try_assess_at(&negative, fixed_now()).await,
        Err(AssessmentError::InvalidUnitPrice { .. })
    ));
}

use chrono::Duration;
use common::config::{AssessorConfig, StatisticsConfig};
use common::generate_unique_id;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use processing::{
    RiskEngine,
    error::StatisticsError,
    model::*,
    storage::InMemoryStorage,
};

use crate::mocks::{ConcurrencyProbe, SlowOrderStore, fixed_now, past_order};

fn window(count: i64) -> Vec<OrderRecord> {
    (1..=count)
        .map(|day| {
            past_order(
                &generate_unique_id("ORD"),
                &generate_unique_id("CUST"),
                450.0,
                PaymentMethod::Card,
                fixed_now() - Duration::days(day),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_cancellation_drops_in_flight_assessments() {
    let slow = SlowOrderStore {
        recent: window(3),
        delay_ms: 10_000,
        ..Default::default()
    };
    let started = slow.started.clone();
    let completed = slow.completed.clone();
    let dropped = slow.dropped.clone();

    let storage = Arc::new(InMemoryStorage::new());
    let engine = RiskEngine::new(
        AssessorConfig::default(),
        StatisticsConfig::default(),
        Arc::new(slow),
        storage.clone(),
        storage,
    );

    let t0 = Instant::now();
    let result = engine
        .statistics_until(
            30,
            fixed_now(),
            tokio::time::sleep(std::time::Duration::from_millis(50)),
        )
        .await;

    assert!(matches!(result, Err(StatisticsError::Cancelled)));
    assert!(t0.elapsed() < std::time::Duration::from_secs(5));
    assert!(started.load(Ordering::SeqCst) > 0);
    assert_eq!(completed.load(Ordering::SeqCst), 0);
    assert_eq!(
        dropped.load(Ordering::SeqCst),
        started.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn test_statistics_timeout_returns_zeros() {
    let storage = Arc::new(InMemoryStorage::new());
    let engine = RiskEngine::new(
        AssessorConfig::default(),
        StatisticsConfig {
            timeout_ms: Some(50),
            ..Default::default()
        },
        Arc::new(SlowOrderStore {
            recent: window(2),
            delay_ms: 10_000,
            ..Default::default()
        }),
        storage.clone(),
        storage,
    );

    let t0 = Instant::now();
    let statistics = engine.get_statistics(30).await;

    assert_eq!(statistics, FraudStatistics::empty());
    assert!(t0.elapsed() < std::time::Duration::from_secs(5));
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let storage = Arc::new(InMemoryStorage::with_data(vec![], vec![], window(6)));
    let probe = Arc::new(ConcurrencyProbe {
        delay_ms: 20,
        ..Default::default()
    });
    let engine = RiskEngine::new(
        AssessorConfig::default(),
        StatisticsConfig {
            max_concurrency: 2,
            ..Default::default()
        },
        storage.clone(),
        probe.clone(),
        storage,
    );

    let statistics = engine
        .statistics_until(30, fixed_now(), std::future::pending())
        .await
        .unwrap();

    assert_eq!(statistics.total_orders, 6);
    assert_eq!(statistics.analyzed_orders, 6);
    let peak = probe.peak.load(Ordering::SeqCst);
    assert!((1..=2).contains(&peak), "peak concurrency was {peak}");
}

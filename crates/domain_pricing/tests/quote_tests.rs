//! Sequenced quote tests
//!
//! Time is paused, so the simulated pricing delay elapses instantly once every
//! task is idle.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use core_kernel::{Money, PolicyTypeCode, ProviderId, Sequenced};
use domain_catalog::{AddOn, Provider};
use domain_pricing::{AddOnSelection, PremiumCalculator, QuoteCoordinator, DEFAULT_QUOTE_LATENCY};
use rust_decimal_macros::dec;

fn provider() -> Provider {
    Provider {
        id: ProviderId::new("bajaj"),
        name: "Bajaj Allianz".to_string(),
        policy_type: PolicyTypeCode::new("car"),
        rating: dec!(4.1),
        base_premium: Money::inr(11500),
        key_benefits: vec![],
        features: BTreeMap::new(),
        add_ons: vec![AddOn {
            id: "zero-dep".into(),
            name: "Zero Depreciation".to_string(),
            description: String::new(),
            premium: Money::inr(1500),
            is_recommended: true,
        }],
        terms_and_conditions: vec![],
    }
}

#[tokio::test(start_paused = true)]
async fn test_single_quote_is_fresh() {
    let coordinator = QuoteCoordinator::default();
    let outcome = coordinator
        .quote(&provider(), &AddOnSelection::new())
        .await
        .unwrap();

    match outcome {
        Sequenced::Fresh { request_id, value } => {
            assert_eq!(request_id, 1);
            assert_eq!(value.breakdown.total_premium, Money::inr(13570));
            assert!(coordinator.is_latest(request_id));
        }
        Sequenced::Superseded { .. } => panic!("Expected a fresh quote"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_quote_waits_for_latency() {
    let coordinator = QuoteCoordinator::new(PremiumCalculator::default(), Duration::from_millis(500));
    let start = tokio::time::Instant::now();

    coordinator
        .quote(&provider(), &AddOnSelection::new())
        .await
        .unwrap();

    assert!(start.elapsed() >= DEFAULT_QUOTE_LATENCY);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_toggle_only_latest_publishes() {
    let coordinator = Arc::new(QuoteCoordinator::default());
    let provider = Arc::new(provider());

    let stale = {
        let coordinator = Arc::clone(&coordinator);
        let provider = Arc::clone(&provider);
        tokio::spawn(async move {
            let selection: AddOnSelection = ["zero-dep"].into_iter().collect();
            coordinator.quote(&provider, &selection).await
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    let latest = coordinator
        .quote(&provider, &AddOnSelection::new())
        .await
        .unwrap();

    let stale = stale.await.unwrap().unwrap();
    assert!(matches!(stale, Sequenced::Superseded { request_id: 1, latest: 2 }));

    let fresh = latest.into_fresh().expect("latest quote should be fresh");
    assert!(fresh.breakdown.add_on_premiums.is_zero());
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_discards_waiting_quote() {
    let coordinator = Arc::new(QuoteCoordinator::default());

    let waiting = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .quote(&provider(), &AddOnSelection::new())
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    coordinator.invalidate();

    let outcome = waiting.await.unwrap().unwrap();
    assert!(matches!(outcome, Sequenced::Superseded { request_id: 1, latest: 2 }));
    assert!(!coordinator.is_latest(1));
}

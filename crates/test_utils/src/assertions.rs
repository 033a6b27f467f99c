//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_pricing::PremiumBreakdown;
use domain_purchase::{PurchaseState, SubmissionReport};

/// Asserts that a Money value is a whole amount in the expected currency
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );
    assert_eq!(
        actual.amount().normalize(),
        expected.amount().normalize(),
        "Amount mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that the breakdown's total equals its parts
///
/// # Panics
///
/// Panics if `total != base + add-ons + taxes - discounts` or any part
/// carries a fractional amount
pub fn assert_breakdown_consistent(breakdown: &PremiumBreakdown) {
    assert!(
        breakdown.is_consistent(),
        "Inconsistent breakdown: base={}, add_ons={}, taxes={}, discounts={}, total={}",
        breakdown.base_premium,
        breakdown.add_on_premiums,
        breakdown.taxes,
        breakdown.discounts,
        breakdown.total_premium
    );

    for (label, part) in [
        ("base", &breakdown.base_premium),
        ("add_ons", &breakdown.add_on_premiums),
        ("taxes", &breakdown.taxes),
        ("total", &breakdown.total_premium),
    ] {
        assert!(
            part.amount().fract().is_zero(),
            "Expected whole units for {}, got {}",
            label,
            part
        );
    }
}

/// Asserts that a field failed with exactly `message`
pub fn assert_field_error(report: &SubmissionReport, field: &str, message: &str) {
    match report.field_errors.get(field) {
        Some(error) => assert_eq!(
            error.message(),
            message,
            "Unexpected message for field '{}'",
            field
        ),
        None => panic!(
            "Expected an error on field '{}', got errors on {:?}",
            field,
            report.field_errors.keys().collect::<Vec<_>>()
        ),
    }
}

/// Asserts that the state equals the initial state
pub fn assert_initial_state(state: &PurchaseState) {
    assert!(
        state.is_initial(),
        "Expected initial state, got step {} with policy type {:?}",
        state.current_step(),
        state.policy_type()
    );
}

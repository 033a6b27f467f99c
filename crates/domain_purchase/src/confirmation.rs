//! Purchase completion

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use core_kernel::{PolicyId, PolicyTypeCode, ProviderId};
use domain_pricing::PremiumBreakdown;

use crate::error::PurchaseError;
use crate::state::PurchaseState;
use crate::validation::FormValidator;

/// Issued policy summary returned when a purchase completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseConfirmation {
    pub policy_id: PolicyId,
    /// Human-readable number, e.g. `HEALTH-2024-1A2B3C4D`
    pub policy_number: String,
    pub policy_type: PolicyTypeCode,
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub insured_name: String,
    pub dependents_covered: usize,
    pub premium: PremiumBreakdown,
    pub issued_at: DateTime<Utc>,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
}

/// Completes the purchase if the submission gate passes
///
/// # Errors
///
/// - `PolicyTypeNotSelected`, `ProviderNotSelected` or
///   `PremiumNotCalculated` if the flow is incomplete
/// - `SubmissionBlocked` listing every outstanding issue
pub fn complete_purchase(
    state: &PurchaseState,
    validator: &FormValidator,
    now: DateTime<Utc>,
) -> Result<PurchaseConfirmation, PurchaseError> {
    let policy_type = state
        .policy_type()
        .cloned()
        .ok_or(PurchaseError::PolicyTypeNotSelected)?;
    let provider = state
        .current_provider()
        .ok_or(PurchaseError::ProviderNotSelected)?;
    let premium = state
        .premium_breakdown()
        .cloned()
        .ok_or(PurchaseError::PremiumNotCalculated)?;

    validator.check_submission(state.form_data()).into_result()?;

    let policy_id = PolicyId::new();
    let policy_number = policy_number(&policy_type, &policy_id, now);

    let valid_from = now.date_naive();
    // One year of cover, ending the day before the anniversary
    let valid_until = valid_from
        .checked_add_months(Months::new(12))
        .and_then(|d| d.pred_opt())
        .unwrap_or(valid_from + Duration::days(364));

    let dependents_covered = if validator.covers_dependents() {
        state.form_data().dependents().len()
    } else {
        0
    };

    info!(
        policy_number = %policy_number,
        provider = %provider.id,
        total = %premium.total_premium,
        "Purchase completed"
    );

    Ok(PurchaseConfirmation {
        policy_id,
        policy_number,
        policy_type,
        provider_id: provider.id.clone(),
        provider_name: provider.name.clone(),
        insured_name: state.form_data().name().unwrap_or_default().to_string(),
        dependents_covered,
        premium,
        issued_at: now,
        valid_from,
        valid_until,
    })
}

fn policy_number(policy_type: &PolicyTypeCode, policy_id: &PolicyId, now: DateTime<Utc>) -> String {
    let suffix = policy_id.as_uuid().simple().to_string();
    format!(
        "{}-{}-{}",
        policy_type.as_str().to_uppercase(),
        now.format("%Y"),
        suffix[..8].to_uppercase()
    )
}

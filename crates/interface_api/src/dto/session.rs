//! Purchase session DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{AddOnId, PolicyTypeCode, ProviderId, SessionId};
use domain_pricing::PremiumCalculation;
use domain_purchase::{Dependent, DispatchOutcome, OtpOutcome, PurchaseState};

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub policy_type: Option<PolicyTypeCode>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub transitions: u64,
    pub state: PurchaseState,
}

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    pub state: PurchaseState,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub provider_id: ProviderId,
    #[serde(default)]
    pub add_on_ids: Vec<AddOnId>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteResponse {
    /// Published into the session
    Fresh {
        request_id: u64,
        calculation: PremiumCalculation,
    },
    /// A newer quote was requested; nothing was published
    Superseded { request_id: u64, latest: u64 },
}

#[derive(Debug, Serialize)]
pub struct DependentsResponse {
    pub dependents: Vec<Dependent>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Defaults to the mobile number already on the form
    #[validate(length(equal = 10))]
    pub mobile: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, max = 10))]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct OtpResponse {
    #[serde(flatten)]
    pub outcome: OtpOutcome,
    pub mobile_verified: bool,
}

#[derive(Debug, Serialize)]
pub struct OtpSentResponse {
    pub status: &'static str,
    pub mobile: String,
}

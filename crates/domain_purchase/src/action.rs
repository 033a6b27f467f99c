//! The closed set of purchase flow actions
//!
//! Actions travel as `{"type": "...", "payload": ...}` with
//! SCREAMING_SNAKE_CASE tags, e.g.
//!
//! ```json
//! {"type": "SET_CURRENT_STEP", "payload": 3}
//! {"type": "UPDATE_FORM_DATA", "payload": {"fields": {"email": "a@b.com"}}}
//! {"type": "RESET_PURCHASE"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{PolicyTypeCode, ProviderId};
use domain_catalog::Provider;
use domain_pricing::PremiumBreakdown;

use crate::form::FormDataPatch;

/// Every transition the purchase flow accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseAction {
    SetPolicyType(PolicyTypeCode),
    /// Shallow merge into the form data
    UpdateFormData(FormDataPatch),
    SetSelectedProviders(Vec<ProviderId>),
    SetCurrentProvider(Box<Provider>),
    UpdatePremiumBreakdown(PremiumBreakdown),
    /// Not range checked against `total_steps`
    SetCurrentStep(u32),
    ResetPurchase,
}

/// Wire tags of every known action
pub const ACTION_TYPES: [&str; 7] = [
    "SET_POLICY_TYPE",
    "UPDATE_FORM_DATA",
    "SET_SELECTED_PROVIDERS",
    "SET_CURRENT_PROVIDER",
    "UPDATE_PREMIUM_BREAKDOWN",
    "SET_CURRENT_STEP",
    "RESET_PURCHASE",
];

impl PurchaseAction {
    /// Wire tag of this action
    pub fn kind(&self) -> &'static str {
        match self {
            PurchaseAction::SetPolicyType(_) => ACTION_TYPES[0],
            PurchaseAction::UpdateFormData(_) => ACTION_TYPES[1],
            PurchaseAction::SetSelectedProviders(_) => ACTION_TYPES[2],
            PurchaseAction::SetCurrentProvider(_) => ACTION_TYPES[3],
            PurchaseAction::UpdatePremiumBreakdown(_) => ACTION_TYPES[4],
            PurchaseAction::SetCurrentStep(_) => ACTION_TYPES[5],
            PurchaseAction::ResetPurchase => ACTION_TYPES[6],
        }
    }

    /// Parses an untyped action, telling unknown tags apart from bad payloads
    pub fn from_value(value: Value) -> Result<Self, DispatchOutcome> {
        let kind = match value.get("type").and_then(Value::as_str) {
            Some(kind) => kind.to_string(),
            None => {
                return Err(DispatchOutcome::MalformedPayload {
                    action: String::new(),
                    reason: "missing action type".to_string(),
                })
            }
        };

        if !ACTION_TYPES.contains(&kind.as_str()) {
            return Err(DispatchOutcome::UnknownAction { action: kind });
        }

        serde_json::from_value(value).map_err(|e| DispatchOutcome::MalformedPayload {
            action: kind,
            reason: e.to_string(),
        })
    }
}

/// What happened to a dispatched untyped action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Applied { action: &'static str },
    /// Tag is not one of [`ACTION_TYPES`]; state unchanged
    UnknownAction { action: String },
    /// Tag is known but the payload does not fit; state unchanged
    MalformedPayload { action: String, reason: String },
}

impl DispatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DispatchOutcome::Applied { .. })
    }

    /// An applied `RESET_PURCHASE`
    pub fn is_reset(&self) -> bool {
        matches!(self, DispatchOutcome::Applied { action } if *action == ACTION_TYPES[6])
    }

    /// An applied action after which in-flight quotes no longer match the flow
    pub fn invalidates_quotes(&self) -> bool {
        self.is_reset()
            || matches!(self, DispatchOutcome::Applied { action } if *action == ACTION_TYPES[0])
    }
}

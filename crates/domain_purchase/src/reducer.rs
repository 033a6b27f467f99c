//! Pure state transitions for the purchase flow

use serde_json::Value;
use tracing::{debug, warn};

use crate::action::{DispatchOutcome, PurchaseAction};
use crate::state::PurchaseState;

/// Applies one action, returning the next state
///
/// Each action replaces exactly the fields it names. `UpdateFormData`
/// merges shallowly; `ResetPurchase` returns the initial state.
pub fn reduce(mut state: PurchaseState, action: PurchaseAction) -> PurchaseState {
    match action {
        PurchaseAction::SetPolicyType(code) => state.policy_type = Some(code),
        PurchaseAction::UpdateFormData(patch) => state.form_data.merge(patch),
        PurchaseAction::SetSelectedProviders(ids) => state.selected_provider_ids = ids,
        PurchaseAction::SetCurrentProvider(provider) => state.current_provider = Some(*provider),
        PurchaseAction::UpdatePremiumBreakdown(breakdown) => {
            state.premium_breakdown = Some(breakdown)
        }
        PurchaseAction::SetCurrentStep(step) => state.current_step = step,
        PurchaseAction::ResetPurchase => return PurchaseState::initial(),
    }
    state
}

/// Owner of one purchase's state
///
/// The only way to change the state is [`PurchaseFlow::dispatch`] or
/// [`PurchaseFlow::dispatch_value`].
#[derive(Debug, Clone, Default)]
pub struct PurchaseFlow {
    state: PurchaseState,
    transitions: u64,
}

impl PurchaseFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PurchaseState {
        &self.state
    }

    /// Number of actions applied since creation (resets included)
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn dispatch(&mut self, action: PurchaseAction) -> &PurchaseState {
        debug!(action = action.kind(), "Dispatching purchase action");
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
        self.transitions += 1;
        &self.state
    }

    /// Dispatches an untyped action; unknown or malformed ones leave state untouched
    pub fn dispatch_value(&mut self, value: Value) -> DispatchOutcome {
        match PurchaseAction::from_value(value) {
            Ok(action) => {
                let kind = action.kind();
                self.dispatch(action);
                DispatchOutcome::Applied { action: kind }
            }
            Err(outcome) => {
                warn!(?outcome, "Ignoring purchase action");
                outcome
            }
        }
    }
}

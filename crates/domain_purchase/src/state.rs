//! The purchase flow state record

use serde::Serialize;

use core_kernel::{PolicyTypeCode, ProviderId};
use domain_catalog::Provider;
use domain_pricing::PremiumBreakdown;

use crate::form::PolicyFormData;

/// Number of steps in the purchase wizard
pub const DEFAULT_TOTAL_STEPS: u32 = 4;

/// Everything known about one customer's purchase in progress
///
/// Fields are read-only outside this crate; every change goes through
/// [`crate::reduce`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseState {
    pub(crate) policy_type: Option<PolicyTypeCode>,
    pub(crate) form_data: PolicyFormData,
    pub(crate) selected_provider_ids: Vec<ProviderId>,
    pub(crate) current_provider: Option<Provider>,
    pub(crate) premium_breakdown: Option<PremiumBreakdown>,
    pub(crate) current_step: u32,
    pub(crate) total_steps: u32,
}

impl PurchaseState {
    /// Empty flow positioned on step 1
    pub fn initial() -> Self {
        Self {
            policy_type: None,
            form_data: PolicyFormData::default(),
            selected_provider_ids: Vec::new(),
            current_provider: None,
            premium_breakdown: None,
            current_step: 1,
            total_steps: DEFAULT_TOTAL_STEPS,
        }
    }

    pub fn policy_type(&self) -> Option<&PolicyTypeCode> {
        self.policy_type.as_ref()
    }

    pub fn form_data(&self) -> &PolicyFormData {
        &self.form_data
    }

    pub fn selected_provider_ids(&self) -> &[ProviderId] {
        &self.selected_provider_ids
    }

    pub fn current_provider(&self) -> Option<&Provider> {
        self.current_provider.as_ref()
    }

    pub fn premium_breakdown(&self) -> Option<&PremiumBreakdown> {
        self.premium_breakdown.as_ref()
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::initial()
    }
}

impl Default for PurchaseState {
    fn default() -> Self {
        Self::initial()
    }
}

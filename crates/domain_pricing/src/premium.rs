//! Premium breakdowns and the add-on aggregation calculator

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{AddOnId, Currency, Money, Rate};
use domain_catalog::{AddOn, Provider};

use crate::error::PricingError;
use crate::selection::AddOnSelection;

/// Goods and services tax applied to every premium, in percent
pub const DEFAULT_TAX_PERCENT: Decimal = dec!(18);

/// Itemized decomposition of a total premium
///
/// Invariant: `total_premium = base_premium + add_on_premiums + taxes - discounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumBreakdown {
    pub base_premium: Money,
    /// Sum over the resolved add-ons
    pub add_on_premiums: Money,
    pub taxes: Money,
    /// No discount engine exists, so this is always zero
    pub discounts: Money,
    pub total_premium: Money,
}

impl PremiumBreakdown {
    pub fn currency(&self) -> Currency {
        self.base_premium.currency()
    }

    /// Base plus add-ons, before tax and discounts
    pub fn subtotal(&self) -> Result<Money, PricingError> {
        Ok(self.base_premium.checked_add(&self.add_on_premiums)?)
    }

    /// Checks the additive invariant and that all parts share a currency
    pub fn is_consistent(&self) -> bool {
        let expected = self
            .subtotal()
            .and_then(|s| Ok(s.checked_add(&self.taxes)?))
            .and_then(|s| Ok(s.checked_sub(&self.discounts)?));
        matches!(expected, Ok(total) if total == self.total_premium)
    }
}

/// Whether every selected add-on id was found in the provider's catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "add_on_ids", rename_all = "snake_case")]
pub enum AddOnResolution {
    AllResolved,
    /// These ids were selected but are not offered; they contributed zero
    UnknownAddOns(Vec<AddOnId>),
}

/// Result of one premium calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumCalculation {
    pub breakdown: PremiumBreakdown,
    /// Add-ons that were priced, in selection order
    pub applied_add_ons: Vec<AddOnId>,
    pub resolution: AddOnResolution,
}

/// Computes premium breakdowns at a fixed tax rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PremiumCalculator {
    tax_rate: Rate,
}

impl PremiumCalculator {
    pub fn new(tax_rate: Rate) -> Self {
        Self { tax_rate }
    }

    pub fn tax_rate(&self) -> Rate {
        self.tax_rate
    }

    /// Prices a base premium plus the selected add-ons
    ///
    /// # Arguments
    ///
    /// * `base_premium` - Provider's base premium
    /// * `add_ons` - The provider's add-on catalog
    /// * `selected` - Ids the customer selected; ids missing from `add_ons`
    ///   contribute zero and are reported in the resolution
    ///
    /// # Errors
    ///
    /// Returns an error for negative amounts or mixed currencies
    pub fn calculate(
        &self,
        base_premium: Money,
        add_ons: &[AddOn],
        selected: &BTreeSet<AddOnId>,
    ) -> Result<PremiumCalculation, PricingError> {
        if base_premium.is_negative() {
            return Err(PricingError::NegativeAmount("base premium".to_string()));
        }

        let mut resolved = Vec::new();
        let mut unknown = Vec::new();
        for id in selected {
            match add_ons.iter().find(|a| &a.id == id) {
                Some(add_on) => {
                    if add_on.premium.is_negative() {
                        return Err(PricingError::NegativeAmount(format!("add-on {}", add_on.id)));
                    }
                    resolved.push(add_on);
                }
                None => unknown.push(id.clone()),
            }
        }

        let currency = base_premium.currency();
        let add_on_premiums = Money::sum(resolved.iter().map(|a| &a.premium), currency)?;
        let subtotal = base_premium.checked_add(&add_on_premiums)?;
        let taxes = self.tax_rate.apply(&subtotal).round_whole();
        let discounts = Money::zero(currency);
        let total_premium = subtotal.checked_add(&taxes)?.checked_sub(&discounts)?;

        let resolution = if unknown.is_empty() {
            AddOnResolution::AllResolved
        } else {
            warn!(unknown = ?unknown, "Selected add-ons not offered by provider; priced at zero");
            AddOnResolution::UnknownAddOns(unknown)
        };

        debug!(
            base = %base_premium,
            add_ons = %add_on_premiums,
            taxes = %taxes,
            total = %total_premium,
            "Premium calculated"
        );

        Ok(PremiumCalculation {
            breakdown: PremiumBreakdown {
                base_premium,
                add_on_premiums,
                taxes,
                discounts,
                total_premium,
            },
            applied_add_ons: resolved.into_iter().map(|a| a.id.clone()).collect(),
            resolution,
        })
    }

    /// Prices a catalog provider with the given selection
    pub fn calculate_for(
        &self,
        provider: &Provider,
        selection: &AddOnSelection,
    ) -> Result<PremiumCalculation, PricingError> {
        self.calculate(provider.base_premium, &provider.add_ons, selection.ids())
    }
}

impl Default for PremiumCalculator {
    fn default() -> Self {
        Self::new(Rate::from_percentage(DEFAULT_TAX_PERCENT))
    }
}

//! Pricing Domain
//!
//! Derives a premium breakdown from a provider's base premium, its add-on
//! catalog and the customer's current add-on selection:
//!
//! ```text
//! add_on_premiums = sum of selected add-on premiums (unknown ids add zero)
//! subtotal        = base_premium + add_on_premiums
//! taxes           = round_half_up(subtotal * tax_rate)      (18% GST)
//! total_premium   = subtotal + taxes - discounts            (discounts = 0)
//! ```
//!
//! The calculation itself is pure and synchronous. [`QuoteCoordinator`] wraps
//! it in a simulated pricing delay where only the newest request completes.

pub mod premium;
pub mod selection;
pub mod quote;
pub mod error;

pub use premium::{
    AddOnResolution, PremiumBreakdown, PremiumCalculation, PremiumCalculator, DEFAULT_TAX_PERCENT,
};
pub use selection::AddOnSelection;
pub use quote::{QuoteCoordinator, DEFAULT_QUOTE_LATENCY};
pub use error::PricingError;

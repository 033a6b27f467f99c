//! Pricing errors
//!
//! Pricing is total over its documented input (non-negative amounts in one
//! currency). These errors cover input outside that domain.

use thiserror::Error;

use core_kernel::MoneyError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Amounts could not be combined, e.g. an add-on priced in another currency
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// A premium amount is below zero
    #[error("Negative amount for {0}")]
    NegativeAmount(String),
}

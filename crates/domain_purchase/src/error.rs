//! Purchase domain errors

use thiserror::Error;

use domain_catalog::CatalogError;
use domain_pricing::PricingError;

/// Errors that can occur in the purchase flow
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// A field's configured pattern is not a valid regular expression
    #[error("Invalid pattern for field '{field}': {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("Dependent not found: {0}")]
    DependentNotFound(String),

    #[error("Invalid mobile number: {0}")]
    InvalidMobile(String),

    #[error("No policy type selected")]
    PolicyTypeNotSelected,

    #[error("No provider selected")]
    ProviderNotSelected,

    #[error("Premium has not been calculated")]
    PremiumNotCalculated,

    /// Submission gate failed; carries every outstanding issue
    #[error("Submission blocked: {}", .0.join("; "))]
    SubmissionBlocked(Vec<String>),
}

impl PurchaseError {
    pub fn dependent_not_found(what: impl std::fmt::Display) -> Self {
        Self::DependentNotFound(what.to_string())
    }
}

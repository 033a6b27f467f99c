//! Catalog domain errors

use thiserror::Error;

/// Errors raised while loading or querying the catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(String),

    /// The catalog document is not valid JSON for the expected shape
    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Duplicate policy type: {0}")]
    DuplicatePolicyType(String),

    #[error("Duplicate provider: {0}")]
    DuplicateProvider(String),

    #[error("Duplicate add-on {add_on} for provider {provider}")]
    DuplicateAddOn { provider: String, add_on: String },

    #[error("Provider {provider} references unknown policy type {policy_type}")]
    UnknownPolicyType { provider: String, policy_type: String },

    #[error("Provider {provider} has rating {rating} outside 0-5")]
    InvalidRating { provider: String, rating: String },

    #[error("Negative premium for {item} of provider {provider}")]
    NegativePremium { provider: String, item: String },

    #[error("Add-on {add_on} of provider {provider} is priced in a different currency than the base premium")]
    CurrencyMismatch { provider: String, add_on: String },

    #[error("Policy type not found: {0}")]
    PolicyTypeNotFound(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// More providers selected for comparison than allowed
    #[error("At most {limit} providers can be compared")]
    ComparisonLimitReached { limit: usize },
}

impl CatalogError {
    pub fn provider_not_found(id: impl std::fmt::Display) -> Self {
        CatalogError::ProviderNotFound(id.to_string())
    }

    pub fn policy_type_not_found(code: impl std::fmt::Display) -> Self {
        CatalogError::PolicyTypeNotFound(code.to_string())
    }
}

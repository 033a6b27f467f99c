//! The immutable provider and policy-type catalog
//!
//! # Invariants
//!
//! Enforced once, when the catalog is built:
//! - Policy-type codes and provider ids are unique
//! - Add-on ids are unique within a provider
//! - Every provider belongs to a known policy type
//! - Ratings lie in 0-5
//! - Premiums are non-negative and add-ons share the base premium's currency

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{PolicyTypeCode, ProviderId};

use crate::comparison::{ComparedProvider, FeatureRow, ProviderComparison, MAX_COMPARED_PROVIDERS};
use crate::error::CatalogError;
use crate::policy_type::PolicyTypeInfo;
use crate::provider::Provider;

/// Ordering applied to provider listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSort {
    /// Catalog order
    #[default]
    Relevance,
    PremiumAsc,
    PremiumDesc,
    RatingDesc,
    Name,
}

/// Filter and sort options for provider listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderQuery {
    #[serde(default)]
    pub policy_type: Option<PolicyTypeCode>,
    /// Upper bound (inclusive) on the base premium amount
    #[serde(default)]
    pub max_base_premium: Option<Decimal>,
    /// Lower bound (inclusive) on the rating
    #[serde(default)]
    pub min_rating: Option<Decimal>,
    #[serde(default)]
    pub sort: ProviderSort,
}

impl ProviderQuery {
    pub fn for_policy_type(code: impl Into<PolicyTypeCode>) -> Self {
        Self {
            policy_type: Some(code.into()),
            ..Default::default()
        }
    }

    fn matches(&self, provider: &Provider) -> bool {
        if let Some(code) = &self.policy_type {
            if &provider.policy_type != code {
                return false;
            }
        }
        if let Some(max) = self.max_base_premium {
            if provider.base_premium.amount() > max {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if provider.rating < min {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    policy_types: Vec<PolicyTypeInfo>,
    #[serde(default)]
    providers: Vec<Provider>,
}

/// Read-only catalog of policy types and providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    policy_types: Vec<PolicyTypeInfo>,
    providers: Vec<Provider>,
}

impl Catalog {
    /// Builds a catalog, rejecting any entry that breaks its invariants
    pub fn new(
        policy_types: Vec<PolicyTypeInfo>,
        providers: Vec<Provider>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            policy_types,
            providers,
        };
        catalog.validate()?;
        debug!(
            policy_types = catalog.policy_types.len(),
            providers = catalog.providers.len(),
            "Catalog validated"
        );
        Ok(catalog)
    }

    /// Parses a catalog JSON document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(document.policy_types, document.providers)
    }

    /// Reads and parses a catalog JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            policy_types = catalog.policy_types.len(),
            providers = catalog.providers.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn policy_types(&self) -> &[PolicyTypeInfo] {
        &self.policy_types
    }

    pub fn policy_type(&self, code: &str) -> Option<&PolicyTypeInfo> {
        self.policy_types.iter().find(|t| t.code.as_str() == code)
    }

    pub fn require_policy_type(&self, code: &str) -> Result<&PolicyTypeInfo, CatalogError> {
        self.policy_type(code)
            .ok_or_else(|| CatalogError::policy_type_not_found(code))
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id.as_str() == id)
    }

    pub fn require_provider(&self, id: &str) -> Result<&Provider, CatalogError> {
        self.provider(id)
            .ok_or_else(|| CatalogError::provider_not_found(id))
    }

    /// Providers offering the given policy type, in catalog order
    pub fn providers_for<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Provider> + 'a {
        self.providers
            .iter()
            .filter(move |p| p.policy_type.as_str() == code)
    }

    /// Filters and sorts providers; ties keep catalog order
    pub fn search(&self, query: &ProviderQuery) -> Vec<&Provider> {
        let mut matches: Vec<&Provider> = self
            .providers
            .iter()
            .filter(|p| query.matches(p))
            .collect();

        match query.sort {
            ProviderSort::Relevance => {}
            ProviderSort::PremiumAsc => {
                matches.sort_by(|a, b| a.base_premium.amount().cmp(&b.base_premium.amount()))
            }
            ProviderSort::PremiumDesc => {
                matches.sort_by(|a, b| b.base_premium.amount().cmp(&a.base_premium.amount()))
            }
            ProviderSort::RatingDesc => matches.sort_by(|a, b| b.rating.cmp(&a.rating)),
            ProviderSort::Name => matches.sort_by(|a, b| a.name.cmp(&b.name)),
        }

        matches
    }

    /// Builds a side-by-side comparison of the given providers
    ///
    /// Duplicate ids are compared once. More than
    /// [`MAX_COMPARED_PROVIDERS`] distinct ids is rejected.
    pub fn compare(&self, ids: &[ProviderId]) -> Result<ProviderComparison, CatalogError> {
        let mut seen = HashSet::new();
        let mut providers = Vec::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            providers.push(self.require_provider(id.as_str())?);
        }

        if providers.len() > MAX_COMPARED_PROVIDERS {
            return Err(CatalogError::ComparisonLimitReached {
                limit: MAX_COMPARED_PROVIDERS,
            });
        }

        let mut feature_names: Vec<&String> = providers
            .iter()
            .flat_map(|p| p.features.keys())
            .collect();
        feature_names.sort();
        feature_names.dedup();

        let feature_rows = feature_names
            .into_iter()
            .map(|name| FeatureRow {
                feature: name.clone(),
                values: providers.iter().map(|p| p.feature(name).cloned()).collect(),
            })
            .collect();

        let cheapest = providers
            .iter()
            .min_by(|a, b| a.base_premium.amount().cmp(&b.base_premium.amount()))
            .map(|p| p.id.clone());

        // max_by returns the last maximum, so fold to keep the first
        let highest_rated = providers
            .iter()
            .fold(None::<&&Provider>, |best, p| match best {
                Some(b) if b.rating >= p.rating => Some(b),
                _ => Some(p),
            })
            .map(|p| p.id.clone());

        Ok(ProviderComparison {
            providers: providers.iter().map(|p| ComparedProvider::from(*p)).collect(),
            feature_rows,
            cheapest,
            highest_rated,
        })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut codes = HashSet::new();
        for policy_type in &self.policy_types {
            if !codes.insert(policy_type.code.as_str()) {
                return Err(CatalogError::DuplicatePolicyType(policy_type.code.to_string()));
            }
        }

        let mut provider_ids = HashSet::new();
        for provider in &self.providers {
            let id = provider.id.to_string();
            if !provider_ids.insert(provider.id.as_str()) {
                return Err(CatalogError::DuplicateProvider(id));
            }
            if !codes.contains(provider.policy_type.as_str()) {
                return Err(CatalogError::UnknownPolicyType {
                    provider: id,
                    policy_type: provider.policy_type.to_string(),
                });
            }
            if provider.rating < Decimal::ZERO || provider.rating > dec!(5) {
                return Err(CatalogError::InvalidRating {
                    provider: id,
                    rating: provider.rating.to_string(),
                });
            }
            if provider.base_premium.is_negative() {
                return Err(CatalogError::NegativePremium {
                    provider: id,
                    item: "base premium".to_string(),
                });
            }

            let mut add_on_ids = HashSet::new();
            for add_on in &provider.add_ons {
                if !add_on_ids.insert(add_on.id.as_str()) {
                    return Err(CatalogError::DuplicateAddOn {
                        provider: id,
                        add_on: add_on.id.to_string(),
                    });
                }
                if add_on.premium.is_negative() {
                    return Err(CatalogError::NegativePremium {
                        provider: id,
                        item: add_on.id.to_string(),
                    });
                }
                if add_on.premium.currency() != provider.base_premium.currency() {
                    return Err(CatalogError::CurrencyMismatch {
                        provider: id,
                        add_on: add_on.id.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "policy_types": [
            { "code": "health", "name": "Health Insurance", "covers_dependents": true },
            { "code": "car", "name": "Car Insurance" }
        ],
        "providers": [
            { "id": "a", "name": "Alpha", "policy_type": "health", "rating": 4.2,
              "base_premium": { "amount": 12000, "currency": "INR" } },
            { "id": "b", "name": "Beta", "policy_type": "health", "rating": 4.6,
              "base_premium": { "amount": 11500, "currency": "INR" } },
            { "id": "c", "name": "Gamma", "policy_type": "car", "rating": 3.9,
              "base_premium": { "amount": 8000, "currency": "INR" } }
        ]
    }"#;

    #[test]
    fn test_from_json_loads_everything() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.policy_types().len(), 2);
        assert_eq!(catalog.providers_for("health").count(), 2);
        assert!(catalog.policy_type("health").unwrap().covers_dependents);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(Catalog::from_json("{ not json"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Catalog::from_path("/definitely/not/here/catalog.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_search_sorts_by_premium() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let mut query = ProviderQuery::for_policy_type("health");
        query.sort = ProviderSort::PremiumAsc;

        let ids: Vec<&str> = catalog.search(&query).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}

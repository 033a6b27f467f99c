//! Catalog DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Money, PolicyTypeCode, ProviderId};
use domain_catalog::{Provider, ProviderSort};

/// Query string for provider listings
#[derive(Debug, Default, Deserialize)]
pub struct ProviderListQuery {
    pub max_premium: Option<Decimal>,
    pub min_rating: Option<Decimal>,
    #[serde(default)]
    pub sort: ProviderSort,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompareRequest {
    #[validate(length(min = 1, max = 3))]
    pub provider_ids: Vec<ProviderId>,
}

/// Listing entry; full details come from `GET /providers/:id`
#[derive(Debug, Serialize)]
pub struct ProviderSummary {
    pub id: ProviderId,
    pub name: String,
    pub policy_type: PolicyTypeCode,
    pub rating: Decimal,
    pub base_premium: Money,
    pub key_benefits: Vec<String>,
    pub add_on_count: usize,
}

impl From<&Provider> for ProviderSummary {
    fn from(provider: &Provider) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            policy_type: provider.policy_type.clone(),
            rating: provider.rating,
            base_premium: provider.base_premium,
            key_benefits: provider.key_benefits.clone(),
            add_on_count: provider.add_ons.len(),
        }
    }
}

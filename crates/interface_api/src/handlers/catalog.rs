//! Catalog handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use domain_catalog::{PolicyTypeInfo, Provider, ProviderComparison, ProviderQuery};

use crate::dto::catalog::*;
use crate::{error::ApiError, AppState};

/// Lists every policy type on sale
pub async fn list_policy_types(State(state): State<AppState>) -> Json<Vec<PolicyTypeInfo>> {
    Json(state.catalog.policy_types().to_vec())
}

/// Lists providers for a policy type, filtered and sorted
pub async fn list_providers(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ProviderListQuery>,
) -> Result<Json<Vec<ProviderSummary>>, ApiError> {
    let policy_type = state.catalog.require_policy_type(&code)?;

    let query = ProviderQuery {
        policy_type: Some(policy_type.code.clone()),
        max_base_premium: query.max_premium,
        min_rating: query.min_rating,
        sort: query.sort,
    };

    Ok(Json(
        state
            .catalog
            .search(&query)
            .into_iter()
            .map(ProviderSummary::from)
            .collect(),
    ))
}

/// Gets a provider with its add-ons, features and terms
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Provider>, ApiError> {
    Ok(Json(state.catalog.require_provider(&id)?.clone()))
}

/// Side-by-side comparison of up to three providers
pub async fn compare_providers(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ProviderComparison>, ApiError> {
    request.validate()?;
    Ok(Json(state.catalog.compare(&request.provider_ids)?))
}

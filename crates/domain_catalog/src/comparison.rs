//! Side-by-side provider comparison
//!
//! The comparison cap is caller-side policy. The purchase state accepts any
//! list of selected providers; callers that want the cap route selection
//! changes through [`ComparisonSelection`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, ProviderId};

use crate::error::CatalogError;
use crate::provider::{FeatureValue, Provider};

/// Maximum number of providers shown side by side
pub const MAX_COMPARED_PROVIDERS: usize = 3;

/// What a toggle did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionChange {
    Added,
    Removed,
}

/// Ordered, duplicate-free, capped list of providers picked for comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonSelection {
    ids: Vec<ProviderId>,
    limit: usize,
}

impl ComparisonSelection {
    pub fn new() -> Self {
        Self::with_limit(MAX_COMPARED_PROVIDERS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            ids: Vec::new(),
            limit,
        }
    }

    /// Starts from an existing selection, dropping duplicates
    ///
    /// Fails if the distinct ids already exceed the limit.
    pub fn from_ids<I>(ids: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = ProviderId>,
    {
        let mut selection = Self::new();
        for id in ids {
            if !selection.contains(&id) {
                selection.add(id)?;
            }
        }
        Ok(selection)
    }

    /// Adds the provider if absent, removes it if present
    pub fn toggle(&mut self, id: ProviderId) -> Result<SelectionChange, CatalogError> {
        if let Some(pos) = self.ids.iter().position(|existing| existing == &id) {
            self.ids.remove(pos);
            return Ok(SelectionChange::Removed);
        }
        self.add(id)?;
        Ok(SelectionChange::Added)
    }

    fn add(&mut self, id: ProviderId) -> Result<(), CatalogError> {
        if self.ids.len() >= self.limit {
            return Err(CatalogError::ComparisonLimitReached { limit: self.limit });
        }
        self.ids.push(id);
        Ok(())
    }

    pub fn contains(&self, id: &ProviderId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ProviderId] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<ProviderId> {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for ComparisonSelection {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary columns for one compared provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedProvider {
    pub id: ProviderId,
    pub name: String,
    pub rating: Decimal,
    pub base_premium: Money,
    pub key_benefits: Vec<String>,
    pub add_on_count: usize,
}

impl From<&Provider> for ComparedProvider {
    fn from(provider: &Provider) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            rating: provider.rating,
            base_premium: provider.base_premium,
            key_benefits: provider.key_benefits.clone(),
            add_on_count: provider.add_ons.len(),
        }
    }
}

/// One feature across all compared providers, `None` where a provider
/// does not list it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub feature: String,
    pub values: Vec<Option<FeatureValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderComparison {
    pub providers: Vec<ComparedProvider>,
    /// Union of all feature names, alphabetically
    pub feature_rows: Vec<FeatureRow>,
    pub cheapest: Option<ProviderId>,
    pub highest_rated: Option<ProviderId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = ComparisonSelection::new();
        assert_eq!(selection.toggle("a".into()).unwrap(), SelectionChange::Added);
        assert_eq!(selection.toggle("a".into()).unwrap(), SelectionChange::Removed);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_rejects_fourth_provider() {
        let mut selection = ComparisonSelection::new();
        for id in ["a", "b", "c"] {
            selection.toggle(id.into()).unwrap();
        }

        let result = selection.toggle("d".into());
        assert_eq!(result, Err(CatalogError::ComparisonLimitReached { limit: 3 }));
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_removal_allowed_at_limit() {
        let mut selection = ComparisonSelection::from_ids(["a", "b", "c"].map(ProviderId::from)).unwrap();
        assert_eq!(selection.toggle("b".into()).unwrap(), SelectionChange::Removed);
        assert_eq!(selection.ids(), &[ProviderId::from("a"), ProviderId::from("c")]);
    }

    #[test]
    fn test_from_ids_drops_duplicates() {
        let selection = ComparisonSelection::from_ids(["a", "a", "b"].map(ProviderId::from)).unwrap();
        assert_eq!(selection.len(), 2);
    }
}

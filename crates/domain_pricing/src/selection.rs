//! The customer's current add-on selection

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use core_kernel::AddOnId;
use domain_catalog::Provider;

/// Set of selected add-on ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddOnSelection(BTreeSet<AddOnId>);

impl AddOnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preselects the provider's recommended add-ons
    pub fn recommended(provider: &Provider) -> Self {
        Self(provider.recommended_add_ons().map(|a| a.id.clone()).collect())
    }

    /// Flips membership and returns whether the add-on is now selected
    pub fn toggle(&mut self, id: AddOnId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn ids(&self) -> &BTreeSet<AddOnId> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<I: Into<AddOnId>> FromIterator<I> for AddOnSelection {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = AddOnSelection::new();
        assert!(selection.toggle("opd".into()));
        assert!(selection.contains("opd"));
        assert!(!selection.toggle("opd".into()));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_collects_from_strs_without_duplicates() {
        let selection: AddOnSelection = ["opd", "dental", "opd"].into_iter().collect();
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_serializes_as_sorted_array() {
        let selection: AddOnSelection = ["zeta", "alpha"].into_iter().collect();
        assert_eq!(serde_json::to_string(&selection).unwrap(), r#"["alpha","zeta"]"#);
    }
}

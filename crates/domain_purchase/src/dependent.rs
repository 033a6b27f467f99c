//! Dependents covered under a family policy
//!
//! Edits are immutable: every operation returns a new list, which the caller
//! dispatches through `UpdateFormData`. Editing one dependent never touches
//! another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::DependentId;

use crate::error::PurchaseError;

/// A family member on the policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub id: DependentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub relation: String,
    #[serde(default)]
    pub medical_history: Vec<String>,
}

impl Dependent {
    /// A freshly added dependent with nothing filled in
    pub fn blank(id: DependentId) -> Self {
        Self {
            id,
            name: String::new(),
            age: None,
            relation: String::new(),
            medical_history: Vec::new(),
        }
    }

    pub fn apply(&mut self, edit: DependentEdit) {
        match edit {
            DependentEdit::Name(name) => self.name = name,
            DependentEdit::Age(age) => self.age = age,
            DependentEdit::Relation(relation) => self.relation = relation,
            DependentEdit::MedicalHistory(history) => self.medical_history = history,
        }
    }

    /// Problems that block submission, empty when complete
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push("name is required".to_string());
        }
        match self.age {
            Some(age) if age >= 1 => {}
            _ => issues.push("age must be at least 1".to_string()),
        }
        if self.relation.trim().is_empty() {
            issues.push("relation is required".to_string());
        }
        issues
    }

    pub fn is_complete(&self) -> bool {
        self.issues().is_empty()
    }
}

/// A single-field edit to one dependent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DependentEdit {
    Name(String),
    Age(Option<u32>),
    Relation(String),
    MedicalHistory(Vec<String>),
}

/// Appends a blank dependent with a timestamp id unique within the list
pub fn add_dependent(dependents: &[Dependent], now: DateTime<Utc>) -> Vec<Dependent> {
    let mut millis = now.timestamp_millis();
    while dependents
        .iter()
        .any(|d| d.id.as_str() == millis.to_string())
    {
        millis += 1;
    }

    let mut next = dependents.to_vec();
    next.push(Dependent::blank(DependentId::from_timestamp_millis(millis)));
    next
}

/// Removes the dependent with `id`
pub fn remove_dependent(
    dependents: &[Dependent],
    id: &DependentId,
) -> Result<Vec<Dependent>, PurchaseError> {
    if !dependents.iter().any(|d| &d.id == id) {
        return Err(PurchaseError::dependent_not_found(id));
    }
    Ok(dependents.iter().filter(|d| &d.id != id).cloned().collect())
}

/// Applies `edit` to the dependent at `index`
pub fn update_dependent(
    dependents: &[Dependent],
    index: usize,
    edit: DependentEdit,
) -> Result<Vec<Dependent>, PurchaseError> {
    if index >= dependents.len() {
        return Err(PurchaseError::dependent_not_found(format!("index {}", index)));
    }
    let mut next = dependents.to_vec();
    next[index].apply(edit);
    Ok(next)
}

//! Providers and their add-on riders

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AddOnId, Money, PolicyTypeCode, ProviderId};

/// An optional, separately priced coverage rider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: AddOnId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whole-unit premium charged on top of the base premium
    pub premium: Money,
    #[serde(default)]
    pub is_recommended: bool,
}

/// A named comparison metric (e.g. claim settlement ratio, network hospitals)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Text(String),
    Number(Decimal),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Text(s) => f.write_str(s),
            FeatureValue::Number(n) => write!(f, "{}", n.normalize()),
        }
    }
}

/// An insurance carrier's priced offering for one policy type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub policy_type: PolicyTypeCode,
    /// Customer rating on a 0-5 scale
    pub rating: Decimal,
    pub base_premium: Money,
    #[serde(default)]
    pub key_benefits: Vec<String>,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureValue>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub terms_and_conditions: Vec<String>,
}

impl Provider {
    /// Looks up an add-on by id
    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id.as_str() == id)
    }

    /// Add-ons flagged as recommended, in catalog order
    pub fn recommended_add_ons(&self) -> impl Iterator<Item = &AddOn> {
        self.add_ons.iter().filter(|a| a.is_recommended)
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }
}

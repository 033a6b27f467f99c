//! Applicant form data and shallow-merge patches

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dependent::Dependent;

/// Well-known field names shared by every policy type
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const MOBILE: &str = "mobile";
}

/// A single entered value
///
/// Untagged in JSON: `true`, `"text"`, `42`, `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Number(Decimal),
    List(Vec<String>),
}

impl FieldValue {
    /// Blank text and empty lists count as empty; flags and numbers never do
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Flag(_) | FieldValue::Number(_) => false,
        }
    }

    /// Numeric reading of the value; text is parsed as a decimal
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Flag(_) | FieldValue::List(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form that patterns are matched against
    pub fn to_match_string(&self) -> String {
        match self {
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.normalize().to_string(),
            FieldValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Everything the applicant has entered so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFormData {
    /// Named fields (name, email, mobile, vehicle and medical details, ...)
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    /// Set only after a successful OTP verification
    #[serde(default)]
    pub mobile_verified: bool,
    /// Family members, health policies only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<Vec<Dependent>>,
}

impl PolicyFormData {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(fields::NAME).and_then(FieldValue::as_text)
    }

    pub fn email(&self) -> Option<&str> {
        self.get(fields::EMAIL).and_then(FieldValue::as_text)
    }

    pub fn mobile(&self) -> Option<&str> {
        self.get(fields::MOBILE).and_then(FieldValue::as_text)
    }

    pub fn dependents(&self) -> &[Dependent] {
        self.dependents.as_deref().unwrap_or(&[])
    }

    /// Shallow merge: keys present in the patch replace, all others stay
    pub fn merge(&mut self, patch: FormDataPatch) {
        self.fields.extend(patch.fields);
        if let Some(verified) = patch.mobile_verified {
            self.mobile_verified = verified;
        }
        if let Some(dependents) = patch.dependents {
            self.dependents = Some(dependents);
        }
    }
}

/// Partial form update carried by `UpdateFormData`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDataPatch {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<Vec<Dependent>>,
}

impl FormDataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn mobile_verified(mut self, verified: bool) -> Self {
        self.mobile_verified = Some(verified);
        self
    }

    pub fn dependents(mut self, dependents: Vec<Dependent>) -> Self {
        self.dependents = Some(dependents);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.mobile_verified.is_none() && self.dependents.is_none()
    }
}

//! Policy types and the applicant fields each one collects

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::PolicyTypeCode;

/// Input kind of an applicant field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Date,
    Select,
    MultiSelect,
}

/// Descriptor for one applicant field and its validation rules
///
/// Rules are evaluated in a fixed order by the purchase domain's form
/// validator: required, then minimum, then maximum, then pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// Regular expression the textual value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Replaces the default range/pattern error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            min: None,
            max: None,
            pattern: None,
            message: None,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: Decimal) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: Decimal) -> Self {
        self.max = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// A product category on sale (health, car, bike, term life, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTypeInfo {
    pub code: PolicyTypeCode,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whether family members can be added as dependents
    #[serde(default)]
    pub covers_dependents: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl PolicyTypeInfo {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder_sets_rules() {
        let spec = FieldSpec::new("age", "Age", FieldKind::Number)
            .required()
            .min(dec!(18))
            .max(dec!(65));

        assert!(spec.required);
        assert_eq!(spec.min, Some(dec!(18)));
        assert_eq!(spec.max, Some(dec!(65)));
        assert!(spec.pattern.is_none());
    }

    #[test]
    fn test_field_spec_json_defaults() {
        let spec: FieldSpec =
            serde_json::from_str(r#"{"name": "city", "label": "City"}"#).unwrap();
        assert_eq!(spec.kind, FieldKind::Text);
        assert!(!spec.required);
        assert!(spec.options.is_empty());
    }

    #[test]
    fn test_field_lookup() {
        let info = PolicyTypeInfo {
            code: PolicyTypeCode::new("car"),
            name: "Car Insurance".to_string(),
            description: String::new(),
            covers_dependents: false,
            fields: vec![FieldSpec::new("registration_number", "Registration Number", FieldKind::Text)],
        };
        assert!(info.field("registration_number").is_some());
        assert!(info.field("age").is_none());
    }
}

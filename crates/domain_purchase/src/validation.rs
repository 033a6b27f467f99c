//! Applicant form validation
//!
//! # Field rules
//!
//! Rules come from the policy type's [`FieldSpec`]s and are checked in a
//! fixed order, stopping at the first failure:
//!
//! 1. Required - missing or blank value fails with "`<label>` is required"
//! 2. Minimum - numeric value below `min`
//! 3. Maximum - numeric value above `max`
//! 4. Pattern - textual value does not match the regular expression
//!
//! An optional field left blank skips checks 2 to 4. A value that does not
//! read as a number skips the range checks. A spec's custom message replaces
//! the default for checks 2 to 4, never for "required".
//!
//! # Submission gate
//!
//! Submission additionally needs a verified mobile number and, when the
//! policy type covers dependents, complete details for every dependent.
//! [`SubmissionReport`] collects every failure, not just the first.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use domain_catalog::{FieldSpec, PolicyTypeInfo};

use crate::error::PurchaseError;
use crate::form::{FieldValue, PolicyFormData};

/// Why a single field failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FieldError {
    Required(String),
    BelowMinimum(String),
    AboveMaximum(String),
    PatternMismatch(String),
}

impl FieldError {
    pub fn message(&self) -> &str {
        match self {
            FieldError::Required(m)
            | FieldError::BelowMinimum(m)
            | FieldError::AboveMaximum(m)
            | FieldError::PatternMismatch(m) => m,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A field spec with its pattern compiled
#[derive(Debug, Clone)]
pub struct FieldValidator {
    spec: FieldSpec,
    pattern: Option<Regex>,
}

impl FieldValidator {
    /// Compiles the field's pattern
    ///
    /// # Errors
    ///
    /// `PurchaseError::InvalidPattern` if the pattern is not a valid regex
    pub fn compile(spec: &FieldSpec) -> Result<Self, PurchaseError> {
        let pattern = spec
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| PurchaseError::InvalidPattern {
                field: spec.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            spec: spec.clone(),
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// First failing rule for `value`, or `None` if it passes
    pub fn validate(&self, value: Option<&FieldValue>) -> Option<FieldError> {
        let spec = &self.spec;
        let value = match value.filter(|v| !v.is_empty()) {
            Some(value) => value,
            None if spec.required => {
                return Some(FieldError::Required(format!("{} is required", spec.label)))
            }
            None => return None,
        };

        if let Some(number) = value.as_number() {
            if let Some(min) = spec.min {
                if number < min {
                    return Some(FieldError::BelowMinimum(self.message_or(|| {
                        format!("{} must be at least {}", spec.label, min.normalize())
                    })));
                }
            }
            if let Some(max) = spec.max {
                if number > max {
                    return Some(FieldError::AboveMaximum(self.message_or(|| {
                        format!("{} must be at most {}", spec.label, max.normalize())
                    })));
                }
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&value.to_match_string()) {
                return Some(FieldError::PatternMismatch(
                    self.message_or(|| format!("{} format is invalid", spec.label)),
                ));
            }
        }

        None
    }

    fn message_or(&self, default: impl FnOnce() -> String) -> String {
        self.spec.message.clone().unwrap_or_else(default)
    }
}

/// Validates a single value against a spec, compiling its pattern on the spot
pub fn validate_field(
    spec: &FieldSpec,
    value: Option<&FieldValue>,
) -> Result<Option<FieldError>, PurchaseError> {
    Ok(FieldValidator::compile(spec)?.validate(value))
}

/// Compiled validators for every field of one policy type
#[derive(Debug, Clone)]
pub struct FormValidator {
    validators: Vec<FieldValidator>,
    covers_dependents: bool,
}

impl FormValidator {
    pub fn for_policy_type(info: &PolicyTypeInfo) -> Result<Self, PurchaseError> {
        Self::from_specs(&info.fields, info.covers_dependents)
    }

    pub fn from_specs(specs: &[FieldSpec], covers_dependents: bool) -> Result<Self, PurchaseError> {
        let validators = specs
            .iter()
            .map(FieldValidator::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            validators,
            covers_dependents,
        })
    }

    pub fn covers_dependents(&self) -> bool {
        self.covers_dependents
    }

    pub fn field(&self, name: &str) -> Option<&FieldValidator> {
        self.validators.iter().find(|v| v.name() == name)
    }

    /// Failing fields only, keyed by field name
    pub fn validate_fields(&self, form: &PolicyFormData) -> BTreeMap<String, FieldError> {
        self.validators
            .iter()
            .filter_map(|v| {
                v.validate(form.get(v.name()))
                    .map(|error| (v.name().to_string(), error))
            })
            .collect()
    }

    /// Evaluates the whole submission gate
    pub fn check_submission(&self, form: &PolicyFormData) -> SubmissionReport {
        let mut report = SubmissionReport {
            field_errors: self.validate_fields(form),
            mobile_verified: form.mobile_verified,
            dependent_errors: BTreeMap::new(),
        };

        if self.covers_dependents {
            for (index, dependent) in form.dependents().iter().enumerate() {
                let issues = dependent.issues();
                if !issues.is_empty() {
                    report.dependent_errors.insert(index, issues);
                }
            }
        }

        report
    }
}

/// Outcome of the submission gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub field_errors: BTreeMap<String, FieldError>,
    pub mobile_verified: bool,
    /// Keyed by position in the dependents list
    pub dependent_errors: BTreeMap<usize, Vec<String>>,
}

impl SubmissionReport {
    pub fn is_ready(&self) -> bool {
        self.field_errors.is_empty() && self.mobile_verified && self.dependent_errors.is_empty()
    }

    /// Every outstanding issue as a flat, human-readable list
    pub fn issues(&self) -> Vec<String> {
        let mut issues: Vec<String> = self
            .field_errors
            .values()
            .map(|e| e.message().to_string())
            .collect();
        if !self.mobile_verified {
            issues.push("Mobile number must be verified".to_string());
        }
        for (index, problems) in &self.dependent_errors {
            for problem in problems {
                issues.push(format!("Dependent {}: {}", index + 1, problem));
            }
        }
        issues
    }

    /// Converts a failed report into the error that blocks completion
    pub fn into_result(self) -> Result<(), PurchaseError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(PurchaseError::SubmissionBlocked(self.issues()))
        }
    }
}

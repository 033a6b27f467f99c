//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults (or `fake` data) for everything else.

use std::collections::BTreeMap;

use fake::faker::address::en::CityName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{DependentId, Money, PolicyTypeCode, ProviderId};
use domain_catalog::{AddOn, FeatureValue, Provider};
use domain_purchase::{Dependent, FormDataPatch};

/// Builder for constructing test providers
pub struct TestProviderBuilder {
    id: ProviderId,
    name: String,
    policy_type: PolicyTypeCode,
    rating: Decimal,
    base_premium: Money,
    features: BTreeMap<String, FeatureValue>,
    add_ons: Vec<AddOn>,
}

impl TestProviderBuilder {
    pub fn new(id: impl Into<ProviderId>) -> Self {
        let id = id.into();
        Self {
            name: format!("{} Insurance", id),
            id,
            policy_type: PolicyTypeCode::new("health"),
            rating: dec!(4.0),
            base_premium: Money::inr(10000),
            features: BTreeMap::new(),
            add_ons: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_policy_type(mut self, code: impl Into<PolicyTypeCode>) -> Self {
        self.policy_type = code.into();
        self
    }

    pub fn with_rating(mut self, rating: Decimal) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_base_premium(mut self, units: i64) -> Self {
        self.base_premium = Money::inr(units);
        self
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: FeatureValue) -> Self {
        self.features.insert(name.into(), value);
        self
    }

    /// Adds an INR add-on
    pub fn with_add_on(mut self, id: &str, premium: i64, recommended: bool) -> Self {
        self.add_ons.push(AddOn {
            id: id.into(),
            name: id.replace('-', " "),
            description: String::new(),
            premium: Money::inr(premium),
            is_recommended: recommended,
        });
        self
    }

    pub fn build(self) -> Provider {
        Provider {
            id: self.id,
            name: self.name,
            policy_type: self.policy_type,
            rating: self.rating,
            base_premium: self.base_premium,
            key_benefits: Vec::new(),
            features: self.features,
            add_ons: self.add_ons,
            terms_and_conditions: Vec::new(),
        }
    }
}

/// Builder for applicant form patches
///
/// Starts from fake contact details; call the `with_*` methods to pin the
/// values a test cares about.
pub struct TestFormBuilder {
    patch: FormDataPatch,
}

impl Default for TestFormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFormBuilder {
    pub fn new() -> Self {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let suffix: u64 = (100_000_000..999_999_999).fake();

        Self {
            patch: FormDataPatch::new()
                .field("name", name)
                .field("email", email)
                .field("mobile", format!("9{}", suffix)),
        }
    }

    /// Adds the remaining health fields
    pub fn for_health(mut self) -> Self {
        let age: u32 = (18..65).fake();
        let city: String = CityName().fake();
        self.patch = self
            .patch
            .field("age", age.to_string())
            .field("city", city);
        self
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.patch = self.patch.field(name, value);
        self
    }

    pub fn verified(mut self) -> Self {
        self.patch = self.patch.mobile_verified(true);
        self
    }

    pub fn with_dependents(mut self, dependents: Vec<Dependent>) -> Self {
        self.patch = self.patch.dependents(dependents);
        self
    }

    pub fn build(self) -> FormDataPatch {
        self.patch
    }
}

/// Builder for dependents
pub struct TestDependentBuilder {
    dependent: Dependent,
}

impl TestDependentBuilder {
    /// A complete dependent with fake name and age
    pub fn new(id: &str) -> Self {
        let name: String = Name().fake();
        let age: u32 = (1..80).fake();
        Self {
            dependent: Dependent {
                id: DependentId::new(id),
                name,
                age: Some(age),
                relation: "spouse".to_string(),
                medical_history: Vec::new(),
            },
        }
    }

    /// A dependent as it looks right after being added
    pub fn blank(id: &str) -> Self {
        Self {
            dependent: Dependent::blank(DependentId::new(id)),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.dependent.name = name.to_string();
        self
    }

    pub fn with_age(mut self, age: Option<u32>) -> Self {
        self.dependent.age = age;
        self
    }

    pub fn with_relation(mut self, relation: &str) -> Self {
        self.dependent.relation = relation.to_string();
        self
    }

    pub fn build(self) -> Dependent {
        self.dependent
    }
}

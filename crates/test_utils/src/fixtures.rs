//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the purchase flow. The sample catalog
//! is the one shipped in `config/catalog.json`, so every fixture test also
//! proves that file still loads.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;

use core_kernel::Money;
use domain_catalog::{Catalog, PolicyTypeInfo, Provider};
use domain_purchase::{FormDataPatch, FormValidator};

static SAMPLE_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json(include_str!("../../../config/catalog.json"))
        .expect("sample catalog should be valid")
});

/// Fixture for catalog test data
pub struct CatalogFixtures;

impl CatalogFixtures {
    /// The shared sample catalog
    pub fn catalog() -> &'static Catalog {
        &SAMPLE_CATALOG
    }

    /// Owned copy for APIs that take the catalog by value
    pub fn owned_catalog() -> Catalog {
        SAMPLE_CATALOG.clone()
    }

    /// Health policy type (covers dependents)
    pub fn health() -> &'static PolicyTypeInfo {
        Self::policy_type("health")
    }

    /// Car policy type
    pub fn car() -> &'static PolicyTypeInfo {
        Self::policy_type("car")
    }

    pub fn policy_type(code: &str) -> &'static PolicyTypeInfo {
        SAMPLE_CATALOG
            .policy_type(code)
            .unwrap_or_else(|| panic!("sample catalog has no policy type '{}'", code))
    }

    /// Health provider with a 12000 base premium and add-ons of 2500, 3000 and 4200
    pub fn care_health() -> &'static Provider {
        Self::provider("care-health")
    }

    /// Car provider with an 11500 base premium
    pub fn bajaj_car() -> &'static Provider {
        Self::provider("bajaj-allianz-car")
    }

    pub fn provider(id: &str) -> &'static Provider {
        SAMPLE_CATALOG
            .provider(id)
            .unwrap_or_else(|| panic!("sample catalog has no provider '{}'", id))
    }

    pub fn health_validator() -> FormValidator {
        FormValidator::for_policy_type(Self::health()).expect("health fields should compile")
    }

    pub fn car_validator() -> FormValidator {
        FormValidator::for_policy_type(Self::car()).expect("car fields should compile")
    }
}

/// Fixture for money amounts used in worked examples
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn health_base() -> Money {
        Money::inr(12000)
    }

    pub fn car_base() -> Money {
        Money::inr(11500)
    }

    /// 12000 + 2500 + 3000 plus 18% tax
    pub fn health_total_with_two_add_ons() -> Money {
        Money::inr(20650)
    }

    /// 11500 plus 18% tax
    pub fn car_total_without_add_ons() -> Money {
        Money::inr(13570)
    }
}

/// Fixture for applicant form data
pub struct FormFixtures;

impl FormFixtures {
    /// Every health field filled in validly
    pub fn valid_health_patch() -> FormDataPatch {
        FormDataPatch::new()
            .field("name", "Asha Menon")
            .field("email", "asha.menon@example.com")
            .field("mobile", Self::mobile())
            .field("age", "34")
            .field("city", "Bengaluru")
    }

    /// Every car field filled in validly
    pub fn valid_car_patch() -> FormDataPatch {
        FormDataPatch::new()
            .field("name", "Ravi Kumar")
            .field("email", "ravi.kumar@example.com")
            .field("mobile", Self::mobile())
            .field("registration_number", "KA01AB1234")
            .field("manufacturing_year", "2019")
            .field("fuel_type", "petrol")
    }

    pub fn mobile() -> &'static str {
        "9876543210"
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Fixed purchase timestamp (Mar 15, 2024)
    pub fn purchase_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    /// Leap-day purchase for cover-period edge cases
    pub fn leap_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
    }
}

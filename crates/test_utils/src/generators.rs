//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random purchase data
//! that maintains domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{DependentId, Money, PolicyTypeCode, ProviderId};
use domain_catalog::AddOn;
use domain_pricing::PremiumBreakdown;
use domain_purchase::{Dependent, DependentEdit, FieldValue, FormDataPatch, PurchaseAction};

/// Strategy for whole-rupee, non-negative premiums
pub fn inr_premium_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000i64).prop_map(Money::inr)
}

/// Strategy for a provider's add-ons with unique ids
pub fn add_ons_strategy(max: usize) -> impl Strategy<Value = Vec<AddOn>> {
    prop::collection::vec((0i64..50_000i64, any::<bool>()), 0..=max).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (premium, recommended))| AddOn {
                id: format!("addon-{}", i).into(),
                name: format!("Add-on {}", i),
                description: String::new(),
                premium: Money::inr(premium),
                is_recommended: recommended,
            })
            .collect()
    })
}

/// Strategy for any form field value
pub fn field_value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<bool>().prop_map(FieldValue::Flag),
        "[a-zA-Z0-9@. ]{0,16}".prop_map(FieldValue::Text),
        (-10_000i64..10_000i64).prop_map(|n| FieldValue::Number(Decimal::from(n))),
        prop::collection::vec("[a-z]{1,8}", 0..4).prop_map(FieldValue::List),
    ]
}

/// Strategy for a dependent with arbitrary (possibly incomplete) details
pub fn dependent_strategy() -> impl Strategy<Value = Dependent> {
    (
        1_000i64..1_000_000i64,
        "[A-Za-z ]{0,12}",
        prop::option::of(0u32..100u32),
        prop_oneof![Just(""), Just("spouse"), Just("child"), Just("parent")],
    )
        .prop_map(|(id, name, age, relation)| Dependent {
            id: DependentId::from_timestamp_millis(id),
            name,
            age,
            relation: relation.to_string(),
            medical_history: Vec::new(),
        })
}

/// Strategy for a single dependent edit
pub fn dependent_edit_strategy() -> impl Strategy<Value = DependentEdit> {
    prop_oneof![
        "[A-Za-z ]{0,12}".prop_map(DependentEdit::Name),
        prop::option::of(0u32..100u32).prop_map(DependentEdit::Age),
        "[a-z]{0,8}".prop_map(DependentEdit::Relation),
        prop::collection::vec("[a-z]{1,8}", 0..3).prop_map(DependentEdit::MedicalHistory),
    ]
}

/// Strategy for a form patch over a small fixed key set
pub fn form_patch_strategy() -> impl Strategy<Value = FormDataPatch> {
    (
        prop::collection::btree_map(
            prop_oneof![Just("name"), Just("email"), Just("mobile"), Just("age"), Just("city")]
                .prop_map(String::from),
            field_value_strategy(),
            0..4,
        ),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(fields, mobile_verified)| FormDataPatch {
            fields,
            mobile_verified,
            dependents: None,
        })
}

fn breakdown_strategy() -> impl Strategy<Value = PremiumBreakdown> {
    (0i64..100_000i64, 0i64..20_000i64, 0i64..20_000i64).prop_map(|(base, add_ons, taxes)| {
        PremiumBreakdown {
            base_premium: Money::inr(base),
            add_on_premiums: Money::inr(add_ons),
            taxes: Money::inr(taxes),
            discounts: Money::inr(0),
            total_premium: Money::inr(base + add_ons + taxes),
        }
    })
}

/// Strategy for any purchase action except `SetCurrentProvider`
///
/// Providers are large; tests that need one build it explicitly.
pub fn purchase_action_strategy() -> impl Strategy<Value = PurchaseAction> {
    prop_oneof![
        prop_oneof![Just("health"), Just("car"), Just("bike")]
            .prop_map(|code| PurchaseAction::SetPolicyType(PolicyTypeCode::new(code))),
        form_patch_strategy().prop_map(PurchaseAction::UpdateFormData),
        prop::collection::vec("[a-z]{3,10}", 0..4).prop_map(|ids| {
            PurchaseAction::SetSelectedProviders(ids.into_iter().map(ProviderId::new).collect())
        }),
        breakdown_strategy().prop_map(PurchaseAction::UpdatePremiumBreakdown),
        (0u32..10u32).prop_map(PurchaseAction::SetCurrentStep),
        Just(PurchaseAction::ResetPurchase),
    ]
}

//! Purchase Flow Domain
//!
//! This crate owns the state threaded through a multi-step insurance
//! purchase and the rules that gate its completion.
//!
//! # Flow
//!
//! ```text
//! SetPolicyType -> UpdateFormData* -> SetSelectedProviders -> SetCurrentProvider
//!              -> UpdatePremiumBreakdown* -> (submit) -> PurchaseConfirmation
//! ```
//!
//! Every change to [`PurchaseState`] goes through [`reduce`], a pure function
//! over a closed set of [`PurchaseAction`]s. [`PurchaseFlow`] wraps the
//! reducer for callers that receive actions as untyped JSON and reports
//! unknown or malformed actions instead of silently dropping them.
//!
//! # Submission gate
//!
//! A purchase can complete only when every applicant field validates, the
//! mobile number has been verified by OTP, and (for policy types covering
//! dependents) every dependent has a name, a positive age and a relation.

pub mod form;
pub mod dependent;
pub mod state;
pub mod action;
pub mod reducer;
pub mod validation;
pub mod otp;
pub mod confirmation;
pub mod error;

pub use form::{FieldValue, FormDataPatch, PolicyFormData};
pub use dependent::{add_dependent, remove_dependent, update_dependent, Dependent, DependentEdit};
pub use state::{PurchaseState, DEFAULT_TOTAL_STEPS};
pub use action::{DispatchOutcome, PurchaseAction};
pub use reducer::{reduce, PurchaseFlow};
pub use validation::{FieldError, FieldValidator, FormValidator, SubmissionReport};
pub use otp::{OtpOutcome, OtpVerifier, DEFAULT_OTP_CODE, DEFAULT_OTP_LATENCY};
pub use confirmation::{complete_purchase, PurchaseConfirmation};
pub use error::PurchaseError;

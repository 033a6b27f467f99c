//! Product Catalog Domain
//!
//! The catalog is the read-only configuration the purchase flow runs
//! against: which policy types are on sale, which providers offer them, what
//! each provider charges, and which add-ons can be attached.
//!
//! A [`Catalog`] is loaded once (usually from a JSON file), validated, and
//! then shared immutably. Nothing in the purchase core mutates it.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_catalog::{Catalog, ProviderQuery, ProviderSort};
//!
//! let catalog = Catalog::from_path("config/catalog.json")?;
//! let cheapest_first = catalog.search(&ProviderQuery {
//!     policy_type: Some("health".into()),
//!     sort: ProviderSort::PremiumAsc,
//!     ..Default::default()
//! });
//! ```

pub mod provider;
pub mod policy_type;
pub mod catalog;
pub mod comparison;
pub mod error;

pub use provider::{AddOn, FeatureValue, Provider};
pub use policy_type::{FieldKind, FieldSpec, PolicyTypeInfo};
pub use catalog::{Catalog, ProviderQuery, ProviderSort};
pub use comparison::{
    ComparedProvider, ComparisonSelection, FeatureRow, ProviderComparison, SelectionChange,
    MAX_COMPARED_PROVIDERS,
};
pub use error::CatalogError;

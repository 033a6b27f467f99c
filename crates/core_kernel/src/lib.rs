//! Core Kernel - Foundational types for the insurance purchase system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money types with precise decimal arithmetic and whole-unit tax rounding
//! - Strongly-typed identifiers (UUID-backed and catalog string codes)
//! - A latest-wins request sequencer for simulated asynchronous work

pub mod money;
pub mod identifiers;
pub mod sequencer;

pub use money::{Money, Currency, MoneyError, Rate};
pub use identifiers::{
    PolicyId, SessionId, PolicyTypeCode, ProviderId, AddOnId, DependentId,
};
pub use sequencer::{LatestWins, RequestTicket, Sequenced};

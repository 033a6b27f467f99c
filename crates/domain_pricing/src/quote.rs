//! Sequenced premium quotes
//!
//! Pricing is published after an artificial delay to mimic a remote rating
//! call. Customers toggle add-ons faster than that, so each quote request is
//! sequenced: a newer request cancels every older one still waiting, and only
//! the newest result is ever handed back as fresh.

use std::time::Duration;

use tracing::debug;

use core_kernel::{LatestWins, Sequenced};
use domain_catalog::Provider;

use crate::error::PricingError;
use crate::premium::{PremiumCalculation, PremiumCalculator};
use crate::selection::AddOnSelection;

/// Delay before a quote is published
pub const DEFAULT_QUOTE_LATENCY: Duration = Duration::from_millis(500);

/// Calculator plus latest-wins sequencing, one per purchase session
#[derive(Debug)]
pub struct QuoteCoordinator {
    calculator: PremiumCalculator,
    latency: Duration,
    sequencer: LatestWins,
}

impl QuoteCoordinator {
    pub fn new(calculator: PremiumCalculator, latency: Duration) -> Self {
        Self {
            calculator,
            latency,
            sequencer: LatestWins::new(),
        }
    }

    pub fn calculator(&self) -> &PremiumCalculator {
        &self.calculator
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Requests a quote, superseding any quote still in flight
    ///
    /// # Returns
    ///
    /// `Sequenced::Fresh` with the calculation if no newer quote was
    /// requested during the delay, `Sequenced::Superseded` otherwise
    pub async fn quote(
        &self,
        provider: &Provider,
        selection: &AddOnSelection,
    ) -> Result<Sequenced<PremiumCalculation>, PricingError> {
        let ticket = self.sequencer.begin();
        debug!(
            request_id = ticket.id(),
            provider = %provider.id,
            add_ons = selection.len(),
            "Quote requested"
        );

        let outcome = self
            .sequencer
            .run_after(ticket, self.latency, || {
                self.calculator.calculate_for(provider, selection)
            })
            .await;

        match outcome {
            Sequenced::Fresh { request_id, value } => Ok(Sequenced::Fresh {
                request_id,
                value: value?,
            }),
            Sequenced::Superseded { request_id, latest } => {
                Ok(Sequenced::Superseded { request_id, latest })
            }
        }
    }

    /// Whether `request_id` is still the newest quote request
    ///
    /// Callers publishing a fresh result into shared state re-check this
    /// under their state lock.
    pub fn is_latest(&self, request_id: u64) -> bool {
        self.sequencer.is_latest(request_id)
    }

    /// Discards every quote still waiting, e.g. when the flow is reset
    pub fn invalidate(&self) {
        let latest = self.sequencer.cancel_pending();
        debug!(latest, "Pending quotes invalidated");
    }

    /// Id of the newest quote request (0 before the first)
    pub fn latest(&self) -> u64 {
        self.sequencer.latest()
    }
}

impl Default for QuoteCoordinator {
    fn default() -> Self {
        Self::new(PremiumCalculator::default(), DEFAULT_QUOTE_LATENCY)
    }
}

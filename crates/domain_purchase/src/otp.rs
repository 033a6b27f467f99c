//! Simulated mobile OTP verification
//!
//! `send` records the number a code was issued for. `verify` waits a fixed
//! delay before comparing the entered code. Verification attempts are
//! sequenced latest-wins, so a retry typed before the previous attempt
//! resolves supersedes it.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use core_kernel::{LatestWins, Sequenced};

use crate::error::PurchaseError;

/// Delay before a verification attempt resolves
pub const DEFAULT_OTP_LATENCY: Duration = Duration::from_millis(1000);

/// Code accepted by the simulated gateway unless configured otherwise
pub const DEFAULT_OTP_CODE: &str = "123456";

pub const OTP_MISMATCH_MESSAGE: &str = "Invalid OTP. Please try again.";

/// Result of one verification attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OtpOutcome {
    Verified { mobile: String },
    Mismatch { message: String },
    /// `verify` was called before any `send`
    NotRequested,
    /// A newer attempt started while this one was waiting
    Superseded,
}

/// OTP gateway stand-in, one per purchase session
#[derive(Debug)]
pub struct OtpVerifier {
    expected_code: String,
    latency: Duration,
    sequencer: LatestWins,
    pending_mobile: Mutex<Option<String>>,
}

impl OtpVerifier {
    pub fn new(expected_code: impl Into<String>, latency: Duration) -> Self {
        Self {
            expected_code: expected_code.into(),
            latency,
            sequencer: LatestWins::new(),
            pending_mobile: Mutex::new(None),
        }
    }

    /// Issues a code for `mobile`, replacing any earlier request
    ///
    /// Attempts still waiting on the previous code resolve `Superseded`.
    ///
    /// # Errors
    ///
    /// `PurchaseError::InvalidMobile` unless `mobile` is exactly ten digits
    pub fn send(&self, mobile: &str) -> Result<(), PurchaseError> {
        let mobile = mobile.trim();
        if mobile.len() != 10 || !mobile.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PurchaseError::InvalidMobile(mobile.to_string()));
        }

        *self.lock_pending() = Some(mobile.to_string());
        self.sequencer.cancel_pending();
        info!(mobile_suffix = &mobile[6..], "OTP sent");
        Ok(())
    }

    pub fn pending_mobile(&self) -> Option<String> {
        self.lock_pending().clone()
    }

    /// Whether `mobile` is still the number the current code was issued for
    pub fn is_pending(&self, mobile: &str) -> bool {
        self.lock_pending().as_deref() == Some(mobile)
    }

    /// Forgets the issued code and supersedes every waiting attempt
    pub fn cancel(&self) {
        *self.lock_pending() = None;
        self.sequencer.cancel_pending();
        debug!("OTP request cancelled");
    }

    /// Checks `code` after the verification delay
    pub async fn verify(&self, code: &str) -> OtpOutcome {
        if self.pending_mobile().is_none() {
            return OtpOutcome::NotRequested;
        }

        // Any `send` after this point supersedes the ticket
        let ticket = self.sequencer.begin();
        let mobile = match self.pending_mobile() {
            Some(mobile) => mobile,
            None => return OtpOutcome::Superseded,
        };
        debug!(request_id = ticket.id(), "OTP verification started");

        let matched = self
            .sequencer
            .run_after(ticket, self.latency, || code.trim() == self.expected_code)
            .await;

        match matched {
            Sequenced::Fresh { value: true, .. } => OtpOutcome::Verified { mobile },
            Sequenced::Fresh { value: false, .. } => OtpOutcome::Mismatch {
                message: OTP_MISMATCH_MESSAGE.to_string(),
            },
            Sequenced::Superseded { .. } => OtpOutcome::Superseded,
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.pending_mobile
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OtpVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_OTP_CODE, DEFAULT_OTP_LATENCY)
    }
}

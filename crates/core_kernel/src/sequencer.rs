//! Latest-wins request sequencing
//!
//! Quote and OTP requests are simulated asynchronous work: each one waits an
//! artificial delay before producing its result. When requests overlap, only
//! the most recently issued one may complete. Every request receives a
//! monotonically increasing id; issuing a newer request wakes the older
//! waiters, which resolve immediately as [`Sequenced::Superseded`] instead of
//! finishing their delay.
//!
//! ```rust,ignore
//! let sequencer = LatestWins::new();
//! let ticket = sequencer.begin();
//! match sequencer.run_after(ticket, Duration::from_millis(500), || compute()).await {
//!     Sequenced::Fresh { value, .. } => publish(value),
//!     Sequenced::Superseded { .. } => {}
//! }
//! ```

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// Result of a sequenced request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sequenced<T> {
    /// The request was still the latest when its delay elapsed
    Fresh { request_id: u64, value: T },
    /// A newer request was issued before this one completed
    Superseded { request_id: u64, latest: u64 },
}

impl<T> Sequenced<T> {
    pub fn request_id(&self) -> u64 {
        match self {
            Sequenced::Fresh { request_id, .. } | Sequenced::Superseded { request_id, .. } => {
                *request_id
            }
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Sequenced::Fresh { .. })
    }

    /// Returns the value of a fresh result
    pub fn into_fresh(self) -> Option<T> {
        match self {
            Sequenced::Fresh { value, .. } => Some(value),
            Sequenced::Superseded { .. } => None,
        }
    }
}

/// Handle for one in-flight request
#[derive(Debug)]
pub struct RequestTicket {
    id: u64,
    latest: watch::Receiver<u64>,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Issues request ids and cancels every request but the newest
#[derive(Debug)]
pub struct LatestWins {
    latest: watch::Sender<u64>,
}

impl LatestWins {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(0);
        Self { latest }
    }

    /// Starts a new request, superseding every request issued before it
    pub fn begin(&self) -> RequestTicket {
        let mut id = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            id = *latest;
        });
        RequestTicket {
            id,
            latest: self.latest.subscribe(),
        }
    }

    /// Supersedes every request in flight without starting a new one
    ///
    /// Returns the id that pending requests now resolve against.
    pub fn cancel_pending(&self) -> u64 {
        let ticket = self.begin();
        debug!(latest = ticket.id, "Pending requests cancelled");
        ticket.id
    }

    /// Id of the most recently issued request (0 before the first)
    pub fn latest(&self) -> u64 {
        *self.latest.borrow()
    }

    pub fn is_latest(&self, request_id: u64) -> bool {
        self.latest() == request_id
    }

    /// Waits `delay`, then runs `work` if the ticket is still the latest
    ///
    /// Returns early with `Superseded` as soon as a newer request begins.
    pub async fn run_after<T, F>(&self, ticket: RequestTicket, delay: Duration, work: F) -> Sequenced<T>
    where
        F: FnOnce() -> T,
    {
        let RequestTicket { id, mut latest } = ticket;
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => break,
                changed = latest.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let newest = *latest.borrow_and_update();
                    if newest != id {
                        debug!(request_id = id, latest = newest, "Request superseded while waiting");
                        return Sequenced::Superseded { request_id: id, latest: newest };
                    }
                }
            }
        }

        let newest = *latest.borrow();
        if newest != id {
            return Sequenced::Superseded { request_id: id, latest: newest };
        }

        Sequenced::Fresh {
            request_id: id,
            value: work(),
        }
    }
}

impl Default for LatestWins {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_ids_are_monotonic() {
        let sequencer = LatestWins::new();
        assert_eq!(sequencer.latest(), 0);

        let first = sequencer.begin();
        let second = sequencer.begin();
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
        assert!(sequencer.is_latest(2));
        assert!(!sequencer.is_latest(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_request_completes_after_delay() {
        let sequencer = LatestWins::new();
        let ticket = sequencer.begin();

        let result = sequencer
            .run_after(ticket, Duration::from_millis(500), || 42)
            .await;

        assert_eq!(result, Sequenced::Fresh { request_id: 1, value: 42 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_request_supersedes_older() {
        let sequencer = Arc::new(LatestWins::new());

        let older = {
            let sequencer = Arc::clone(&sequencer);
            let ticket = sequencer.begin();
            tokio::spawn(async move {
                sequencer
                    .run_after(ticket, Duration::from_millis(500), || "stale")
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        let ticket = sequencer.begin();
        let newer = sequencer
            .run_after(ticket, Duration::from_millis(500), || "fresh")
            .await;

        assert_eq!(newer, Sequenced::Fresh { request_id: 2, value: "fresh" });
        assert_eq!(
            older.await.unwrap(),
            Sequenced::Superseded { request_id: 1, latest: 2 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_supersedes_waiting_request() {
        let sequencer = Arc::new(LatestWins::new());

        let waiting = {
            let sequencer = Arc::clone(&sequencer);
            let ticket = sequencer.begin();
            tokio::spawn(async move {
                sequencer
                    .run_after(ticket, Duration::from_millis(500), || "stale")
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sequencer.cancel_pending(), 2);

        assert_eq!(
            waiting.await.unwrap(),
            Sequenced::Superseded { request_id: 1, latest: 2 }
        );
        assert!(!sequencer.is_latest(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticket_begun_after_completion_does_not_affect_result() {
        let sequencer = LatestWins::new();
        let first = sequencer
            .run_after(sequencer.begin(), Duration::from_millis(10), || 1)
            .await;
        let second = sequencer
            .run_after(sequencer.begin(), Duration::from_millis(10), || 2)
            .await;

        assert_eq!(first.into_fresh(), Some(1));
        assert_eq!(second.into_fresh(), Some(2));
    }
}

//! Latest-wins sequencing for overlapping requests.
//!
//! Each request takes a [`Ticket`] carrying a sequence number and a
//! [`CancellationToken`]. Starting a request cancels the previous one, and a
//! finished request is accepted only if no newer ticket was issued since, so
//! a slow stale response can never replace a newer one regardless of the
//! order responses arrive in.

use std::future::Future;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Issues tickets and decides which responses are still current.
///
/// The latest ticket is held under one lock, so issuing a sequence number
/// and cancelling its predecessor happen together even across threads.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Mutex<Ticket>,
}

/// Handle for one request.
#[derive(Debug, Clone, Default)]
pub struct Ticket {
    seq: u64,
    token: CancellationToken,
}

impl Ticket {
    /// Sequence number, increasing with each issued ticket.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Whether a newer request has cancelled this one.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, cancelling the one in flight.
    pub fn begin(&self) -> Ticket {
        let mut latest = self.latest.lock();
        let ticket = Ticket {
            seq: latest.seq + 1,
            token: CancellationToken::new(),
        };

        let previous = std::mem::replace(&mut *latest, ticket.clone());
        previous.token.cancel();

        ticket
    }

    /// Whether `ticket` is still the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.lock().seq == ticket.seq
    }

    /// Run `request` under a fresh ticket.
    ///
    /// Returns `None` if a newer request was started before this one
    /// finished; the future is dropped as soon as it is cancelled.
    pub async fn run<F, T>(&self, request: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin();

        let output = tokio::select! {
            biased;
            () = ticket.token.cancelled() => None,
            output = request => Some(output),
        };

        match output {
            Some(value) if self.is_current(&ticket) => Some(value),
            _ => {
                tracing::debug!(seq = ticket.seq, "Discarding superseded response");
                None
            }
        }
    }
}

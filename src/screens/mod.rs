//! Screen state for the two routes. Screens never await; they hand
//! [`Request`]s to the worker through a [`Dispatcher`] and apply the
//! matching [`AppEvent`](crate::types::AppEvent) when it comes back.

pub mod detail;
pub mod list;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::types::Ticket;
use crate::worker::Request;

pub use detail::{DetailScreen, GenerationStatus};
pub use list::{Card, ListScreen};

/// Hands out tickets and forwards requests to the worker.
pub struct Dispatcher {
    tx: UnboundedSender<Request>,
    next_ticket: Ticket,
}

impl Dispatcher {
    pub fn new(tx: UnboundedSender<Request>) -> Self {
        Self { tx, next_ticket: 1 }
    }

    /// Reserve a ticket and a fresh cancellation token for a new request.
    pub fn begin(&mut self) -> Pending {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        Pending {
            ticket,
            cancel: CancellationToken::new(),
        }
    }

    pub fn send(&self, req: Request) {
        if self.tx.send(req).is_err() {
            log::error!("[dispatch] worker is gone, request dropped");
        }
    }
}

/// An in-flight request owned by a screen.
#[derive(Debug, Clone)]
pub struct Pending {
    pub ticket: Ticket,
    pub cancel: CancellationToken,
}

impl Pending {
    pub fn matches(&self, ticket: Ticket) -> bool {
        self.ticket == ticket
    }
}

/// Cancel and clear an optional pending request.
pub(crate) fn cancel_pending(slot: &mut Option<Pending>) {
    if let Some(p) = slot.take() {
        p.cancel.cancel();
    }
}

//! Management link seam
//!
//! The byte-level transport to the controller is assumed to exist, already
//! reliable and ordered. These traits are the boundary: an interface accepts
//! (or refuses) registration and hands back a link; a link queues framed
//! requests and delivers each reply through a one-shot completion token.

use std::sync::mpsc;
use std::sync::Arc;

use thiserror::Error;

use swb_protocol::{Reply, WireMessage};

/// One-shot completion token for a single request/reply exchange.
///
/// The management layer calls [`Completion::complete`] exactly once when the
/// exchange finishes. A token dropped without completing leaves the waiting
/// caller to its timeout.
#[derive(Debug)]
pub struct Completion {
    tx: mpsc::Sender<Reply>,
}

impl Completion {
    /// Create a token and the receiver the caller will block on.
    pub fn new() -> (Self, mpsc::Receiver<Reply>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Deliver the reply. The waiting side may already have timed out and
    /// gone away; that is not an error here.
    pub fn complete(self, reply: Reply) {
        let _ = self.tx.send(reply);
    }
}

/// A request could not be queued on the link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("submit refused: {0}")]
pub struct SubmitError(pub String);

/// A management interface refused to register a conversation endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("registration refused: {0}")]
pub struct RegisterError(pub String);

/// An established conversation endpoint with the controller.
pub trait ManagementLink: Send + Sync {
    /// Queue one request. The link must eventually hand the reply to `done`;
    /// returning `Err` means nothing was queued and `done` was discarded.
    fn submit(&self, request: &WireMessage, done: Completion) -> Result<(), SubmitError>;
}

/// One candidate management interface instance.
pub trait ManagementInterface {
    /// Attempt to register a conversation endpoint on this interface.
    fn register(&self) -> Result<Arc<dyn ManagementLink>, RegisterError>;
}

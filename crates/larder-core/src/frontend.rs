//! Signals from the core to whatever renders it.
//!
//! The core never prompts or prints. It raises two kinds of signal and lets
//! the frontend decide how to present them:
//!
//! - a credential request, when the suggestion service has no key
//! - a notice, when a suggestion fetch failed

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

use crate::types::{ItemId, Service};

/// A user-visible message about an enrichment outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub item_id: ItemId,
    pub item_name: String,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_name, self.message)
    }
}

/// Receiver side of the core's UI signals.
pub trait Frontend: Send + Sync {
    /// Ask the user for a credential. Must not block the caller.
    fn request_credential(&self, service: Service);

    /// Show a notice.
    fn notify(&self, notice: Notice);
}

/// Frontend that discards every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFrontend;

impl Frontend for NullFrontend {
    fn request_credential(&self, _service: Service) {}

    fn notify(&self, _notice: Notice) {}
}

/// A signal as delivered through [`ChannelFrontend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendSignal {
    CredentialRequired(Service),
    Notice(Notice),
}

/// Frontend that forwards signals into an unbounded channel, for event loops
/// that handle them in their own task.
#[derive(Debug, Clone)]
pub struct ChannelFrontend {
    tx: mpsc::UnboundedSender<FrontendSignal>,
}

impl ChannelFrontend {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FrontendSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Frontend for ChannelFrontend {
    fn request_credential(&self, service: Service) {
        // Receiver gone means nobody is rendering anymore.
        let _ = self.tx.send(FrontendSignal::CredentialRequired(service));
    }

    fn notify(&self, notice: Notice) {
        let _ = self.tx.send(FrontendSignal::Notice(notice));
    }
}

//! Seams to the shell-owned widgets the capture flow talks to.
//!
//! # Responsibility
//! - Describe the rendering surface (current address + async selection query).
//! - Describe the manual note pane (read typed text, clear after save).
//!
//! # Invariants
//! - A selection query never blocks the caller; the surface answers later
//!   through the `SelectionReply` half of a one-shot channel.
//! - A reply dropped without an answer reads as "no selection".

use tokio::sync::oneshot;

/// Embedded web-document viewer owned by the shell.
pub trait RenderingSurface {
    /// Address of the currently displayed document.
    fn current_address(&self) -> String;
    /// Starts an asynchronous query for the user's current text selection.
    fn request_selection(&self) -> SelectionRequest;
}

/// Typed-note pane owned by the shell.
///
/// Methods take `&self`; widget handles are interior-mutable on every
/// toolkit we target.
pub trait ManualEntry {
    fn text(&self) -> String;
    fn clear(&self);
}

/// Pending answer to a selection query.
#[derive(Debug)]
pub struct SelectionRequest {
    rx: oneshot::Receiver<String>,
}

/// Answering half handed to the rendering surface's callback.
#[derive(Debug)]
pub struct SelectionReply {
    tx: oneshot::Sender<String>,
}

/// Creates a linked reply/request pair.
pub fn selection_channel() -> (SelectionReply, SelectionRequest) {
    let (tx, rx) = oneshot::channel();
    (SelectionReply { tx }, SelectionRequest { rx })
}

impl SelectionReply {
    /// Delivers the selection text. Ignored if the requester went away.
    pub fn deliver(self, selection: impl Into<String>) {
        let _ = self.tx.send(selection.into());
    }
}

impl SelectionRequest {
    /// An already-answered request, for surfaces that know the selection
    /// synchronously.
    pub fn ready(selection: impl Into<String>) -> Self {
        let (reply, request) = selection_channel();
        reply.deliver(selection);
        request
    }

    /// Waits for the surface callback. `None` when the reply was dropped.
    pub async fn resolve(self) -> Option<String> {
        self.rx.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{selection_channel, SelectionRequest};

    #[tokio::test]
    async fn ready_request_resolves_immediately() {
        let selection = SelectionRequest::ready("picked").resolve().await;
        assert_eq!(selection.as_deref(), Some("picked"));
    }

    #[tokio::test]
    async fn dropped_reply_resolves_to_none() {
        let (reply, request) = selection_channel();
        drop(reply);
        assert_eq!(request.resolve().await, None);
    }
}

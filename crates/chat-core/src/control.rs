//! Document Trigger Control
//!
//! What the message view shows for an attached document.

use crate::message::Message;
use crate::viewer::FetchState;

/// The "open document" button of a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentControl {
    name: String,
}

impl DocumentControl {
    /// Control for a message, absent when no document is attached
    pub fn for_message(message: &Message) -> Option<Self> {
        message.document().map(|name| Self { name: name.to_string() })
    }

    pub fn document_name(&self) -> &str {
        &self.name
    }

    pub fn label(&self, state: &FetchState) -> &'static str {
        if state.is_loading() {
            "Opening..."
        } else if state.can_retry() {
            "Retry"
        } else {
            "Open document"
        }
    }

    /// Disabled while a fetch for this message is in flight
    pub fn is_disabled(&self, state: &FetchState) -> bool {
        state.is_loading()
    }
}

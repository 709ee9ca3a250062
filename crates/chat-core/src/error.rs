//! Error Types

use thiserror::Error;

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors from the document fetch-and-open flow
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Message carries no document identifier
    #[error("Message has no attached document")]
    NoDocument,

    /// Transport failure (connection refused, DNS, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Document request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// Host failed to create, open or release an object URL
    #[error("Host error: {0}")]
    Host(String),

    /// Host refused to open a new browsing context
    #[error("Popup blocked while opening {0}")]
    PopupBlocked(String),

    /// Transcript payload could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocumentError {
    /// Check if retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            DocumentError::Network(_) | DocumentError::PopupBlocked(_) => true,
            DocumentError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            DocumentError::NoDocument => "There is no document attached to this message.".into(),
            DocumentError::Network(_) => "Could not reach the document server. Please try again.".into(),
            DocumentError::Status { status: 404, .. } => "The document could not be found.".into(),
            DocumentError::Status { status: 401 | 403, .. } => {
                "You are not allowed to open this document.".into()
            }
            DocumentError::Status { status, .. } => {
                format!("The document server returned an error ({status}).")
            }
            DocumentError::Host(_) => "The document could not be opened in this browser.".into(),
            DocumentError::PopupBlocked(_) => {
                "Your browser blocked the new window. Allow popups for this site and try again.".into()
            }
            DocumentError::Json(_) => "The conversation could not be loaded.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let server = DocumentError::Status { status: 503, url: "x".into() };
        let missing = DocumentError::Status { status: 404, url: "x".into() };
        assert!(server.is_retryable());
        assert!(!missing.is_retryable());
        assert!(!DocumentError::NoDocument.is_retryable());
    }

    #[test]
    fn test_user_messages_distinguish_popup_from_fetch() {
        let blocked = DocumentError::PopupBlocked("blob:1".into()).user_message();
        let missing = DocumentError::Status { status: 404, url: "x".into() }.user_message();
        assert!(blocked.contains("blocked"));
        assert!(missing.contains("could not be found"));
        assert_ne!(blocked, missing);
    }
}

//! Chat Messages
//!
//! The record a message view is rendered from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single chat message as delivered to the view
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Text content (markdown when authored by the bot)
    pub text: String,

    /// Authored by the automated agent
    #[serde(rename = "isBot")]
    pub is_bot: bool,

    /// Attached document identifier, empty when none
    #[serde(default)]
    pub document_name: String,

    /// Creation time, if the backend supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new message
    pub fn new(text: impl Into<String>, is_bot: bool) -> Self {
        Self {
            text: text.into(),
            is_bot,
            document_name: String::new(),
            created_at: None,
        }
    }

    /// Create a user-authored message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// Create a bot-authored message
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Attach a document identifier
    pub fn with_document(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    /// Stamp with a creation time
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Attached document identifier; an empty name means no document
    pub fn document(&self) -> Option<&str> {
        if self.document_name.is_empty() {
            None
        } else {
            Some(&self.document_name)
        }
    }

    pub fn has_document(&self) -> bool {
        self.document().is_some()
    }

    /// Role label used for styling
    pub fn author_label(&self) -> &'static str {
        if self.is_bot { "bot" } else { "user" }
    }

    /// Short local-independent time label, e.g. "14:05"
    pub fn time_label(&self) -> Option<String> {
        self.created_at.map(|at| at.format("%H:%M").to_string())
    }
}

/// Parse a transcript handed over by the host page: a JSON array of messages
pub fn parse_transcript(json: &str) -> Result<Vec<Message>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_document_name_means_no_document() {
        let msg = Message::bot("hi").with_document("");
        assert_eq!(msg.document(), None);
        assert!(!msg.has_document());

        let msg = Message::user("hello").with_document("report.pdf");
        assert_eq!(msg.document(), Some("report.pdf"));
    }

    #[test]
    fn test_wire_format() {
        let msg: Message = serde_json::from_str(
            r#"{"text": "**bold**", "isBot": true, "document_name": "CS101/notes.pdf"}"#,
        )
        .unwrap();
        assert!(msg.is_bot);
        assert_eq!(msg.document(), Some("CS101/notes.pdf"));
        assert_eq!(msg.created_at, None);

        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json["isBot"], false);
        assert_eq!(json["document_name"], "");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_missing_document_name_defaults_to_empty() {
        let msg: Message = serde_json::from_str(r#"{"text": "hey", "isBot": false}"#).unwrap();
        assert_eq!(msg.document_name, "");
        assert!(!msg.has_document());
    }

    #[test]
    fn test_parse_transcript() {
        let messages = parse_transcript(
            r#"[
                {"text": "Where is the syllabus?", "isBot": false},
                {"text": "See **week 1**.", "isBot": true, "document_name": "CS101/syllabus.pdf"}
            ]"#,
        )
        .unwrap();

        assert_eq!(messages.len(), 2);
        assert!(!messages[0].has_document());
        assert_eq!(messages[1].document(), Some("CS101/syllabus.pdf"));
    }

    #[test]
    fn test_parse_transcript_rejects_garbage() {
        let result = parse_transcript(r#"{"text": "not an array"}"#);
        assert!(matches!(result, Err(crate::error::DocumentError::Json(_))));
    }

    #[test]
    fn test_labels() {
        let at = Utc.with_ymd_and_hms(2024, 1, 18, 14, 5, 0).unwrap();
        let msg = Message::bot("x").with_created_at(at);
        assert_eq!(msg.author_label(), "bot");
        assert_eq!(msg.time_label().as_deref(), Some("14:05"));
        assert_eq!(Message::user("x").author_label(), "user");
    }
}

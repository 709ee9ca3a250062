//! Document Fetching
//!
//! Addressing of the document endpoint and the fetch-then-open flow.
//!
//! ```text
//! click ──▶ DocumentFetcher::open
//!              │ GET {base}/embed/documents/{id}     (DocumentSource)
//!              │ create object URL                   (DocumentViewer)
//!              │ open in new browsing context
//!              ▼
//!           OpenedDocument ── dropped ──▶ URL revoked
//! ```

mod http;
mod mock;

pub use http::HttpDocumentSource;
pub use mock::MockDocumentSource;

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{DocumentError, Result};
use crate::message::Message;
use crate::viewer::{DocumentViewer, ObjectUrlLease, OpenedDocument, ReleaseTimer};

/// Path of the document endpoint relative to the base URL
pub const DOCUMENTS_PATH: &str = "/embed/documents/";

/// Characters left alone when encoding a URI component
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a document identifier as a single path segment
pub fn encode_document_id(id: &str) -> String {
    utf8_percent_encode(id, URI_COMPONENT).to_string()
}

/// Full URL of a document on the server
pub fn document_url(base_url: &str, id: &str) -> String {
    format!("{base_url}{DOCUMENTS_PATH}{}", encode_document_id(id))
}

/// Content type the document server uses for a file name
pub fn media_type_for(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".pptx") {
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    } else if lower.ends_with(".ppt") {
        "application/vnd.ms-powerpoint"
    } else {
        "application/octet-stream"
    }
}

/// A document payload received in full
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedDocument {
    /// Identifier the document was requested by
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FetchedDocument {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build with the content type inferred from the name
    pub fn inferred(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = media_type_for(&name);
        Self::new(name, content_type, bytes)
    }
}

/// Where document payloads come from (Strategy pattern)
///
/// Futures are not `Send`: the browser client runs on the page's event loop.
#[async_trait(?Send)]
pub trait DocumentSource {
    /// Fetch a document by identifier, body read in full
    async fn fetch(&self, id: &str) -> Result<FetchedDocument>;
}

/// Fetches a message's document and opens it through a viewer
#[derive(Clone, Debug)]
pub struct DocumentFetcher<S> {
    source: S,
}

impl<S: DocumentSource> DocumentFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch the message's document and open it in a new browsing context.
    ///
    /// Messages without a document never reach the source. The returned
    /// handle owns the object URL; a refused popup revokes it before
    /// returning.
    pub async fn open<V: DocumentViewer>(
        &self,
        message: &Message,
        viewer: V,
    ) -> Result<OpenedDocument<V>> {
        let id = message.document().ok_or(DocumentError::NoDocument)?;

        let document = self.source.fetch(id).await?;
        tracing::debug!(
            document = %document.name,
            content_type = %document.content_type,
            size = document.bytes.len(),
            "document fetched"
        );

        let lease = ObjectUrlLease::acquire(viewer, &document)?;
        if !lease.viewer().open(lease.url())? {
            tracing::warn!(document = %document.name, "new window was blocked");
            return Err(DocumentError::PopupBlocked(lease.url().to_string()));
        }

        Ok(OpenedDocument::new(&document, lease))
    }

    /// `open`, then revoke the object URL once `delay` has passed
    pub async fn open_with_release<V, T>(
        &self,
        message: &Message,
        viewer: V,
        timer: &T,
        delay: Duration,
    ) -> Result<()>
    where
        V: DocumentViewer + 'static,
        T: ReleaseTimer,
    {
        let opened = self.open(message, viewer).await?;
        opened.release_after(timer, delay);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::DocumentControl;
    use crate::viewer::{FetchState, ManualTimer, RecordingViewer};
    use percent_encoding::percent_decode_str;

    #[test]
    fn test_encode_reserved_characters() {
        let encoded = encode_document_id("docs/a b#1.pdf");
        assert_eq!(encoded, "docs%2Fa%20b%231.pdf");

        let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
        assert_eq!(decoded, "docs/a b#1.pdf");
    }

    #[test]
    fn test_encode_matches_uri_component_rules() {
        assert_eq!(encode_document_id("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_document_id("?&=+%"), "%3F%26%3D%2B%25");
        assert_eq!(encode_document_id("résumé.pdf"), "r%C3%A9sum%C3%A9.pdf");
    }

    #[test]
    fn test_encode_round_trip_unicode_and_reserved() {
        for id in ["CS101/Lecture 3 – Intro.pptx", "100%/[draft]?.ppt", "日本語.pdf"] {
            let encoded = encode_document_id(id);
            assert!(!encoded.contains('/'));
            assert_eq!(percent_decode_str(&encoded).decode_utf8().unwrap(), id);
        }
    }

    #[test]
    fn test_document_url() {
        assert_eq!(
            document_url("http://localhost:8000", "report.pdf"),
            "http://localhost:8000/embed/documents/report.pdf"
        );
        assert_eq!(
            document_url("https://host/api", "docs/a b#1.pdf"),
            "https://host/api/embed/documents/docs%2Fa%20b%231.pdf"
        );
    }

    #[test]
    fn test_media_types() {
        assert_eq!(media_type_for("notes.PDF"), "application/pdf");
        assert_eq!(
            media_type_for("slides.pptx"),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        assert_eq!(media_type_for("old.ppt"), "application/vnd.ms-powerpoint");
        assert_eq!(media_type_for("data.bin"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_open_fetches_once_and_opens_once() {
        let source = MockDocumentSource::new().with_document("report.pdf", b"%PDF".to_vec());
        let fetcher = DocumentFetcher::new(source.clone());
        let viewer = RecordingViewer::new();

        let message = Message::user("hello").with_document("report.pdf");
        let opened = fetcher.open(&message, viewer.clone()).await.unwrap();

        assert_eq!(source.requests(), vec!["report.pdf".to_string()]);
        assert_eq!(viewer.log().opened, vec![opened.url().to_string()]);
        assert_eq!(opened.content_type, "application/pdf");
        assert_eq!(opened.size, 4);
        assert_eq!(viewer.log().content_types, vec!["application/pdf".to_string()]);
        assert_eq!(viewer.live_urls().len(), 1);

        opened.release();
        assert!(viewer.live_urls().is_empty());
    }

    #[tokio::test]
    async fn test_no_document_never_fetches() {
        let source = MockDocumentSource::new();
        let fetcher = DocumentFetcher::new(source.clone());
        let viewer = RecordingViewer::new();

        let result = fetcher.open(&Message::bot("**bold**"), viewer.clone()).await;

        assert!(matches!(result, Err(DocumentError::NoDocument)));
        assert!(source.requests().is_empty());
        assert!(viewer.log().created.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_creates_no_url() {
        let source = MockDocumentSource::new().with_status("gone.pdf", 404);
        let fetcher = DocumentFetcher::new(source);
        let viewer = RecordingViewer::new();

        let message = Message::bot("see attached").with_document("gone.pdf");
        let result = fetcher.open(&message, viewer.clone()).await;

        assert!(matches!(result, Err(DocumentError::Status { status: 404, .. })));
        assert!(viewer.log().created.is_empty());
    }

    #[tokio::test]
    async fn test_popup_blocked_revokes_url() {
        let source = MockDocumentSource::new().with_document("slides.pptx", vec![1, 2, 3]);
        let fetcher = DocumentFetcher::new(source);
        let viewer = RecordingViewer::blocking_popups();

        let message = Message::bot("slides").with_document("slides.pptx");
        let result = fetcher.open(&message, viewer.clone()).await;

        assert!(matches!(result, Err(DocumentError::PopupBlocked(_))));
        assert_eq!(viewer.log().created.len(), 1);
        assert!(viewer.live_urls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_opens_are_independent() {
        let source = MockDocumentSource::new().with_document("report.pdf", b"%PDF".to_vec());
        let fetcher = DocumentFetcher::new(source.clone());
        let viewer = RecordingViewer::new();
        let message = Message::user("hello").with_document("report.pdf");

        let first = fetcher.open(&message, viewer.clone()).await.unwrap();
        let second = fetcher.open(&message, viewer.clone()).await.unwrap();

        assert_eq!(source.requests().len(), 2);
        assert_ne!(first.url(), second.url());
        drop(first);
        assert_eq!(viewer.live_urls(), vec![second.url().to_string()]);
    }

    #[tokio::test]
    async fn test_click_requests_the_encoded_document_once() {
        let source = MockDocumentSource::new().with_document("docs/a b#1.pdf", b"%PDF".to_vec());
        let fetcher = DocumentFetcher::new(source.clone());
        let viewer = RecordingViewer::new();
        let timer = ManualTimer::new();
        let message = Message::user("hello").with_document("docs/a b#1.pdf");

        let mut state = FetchState::Idle;
        assert!(state.begin());
        let result = fetcher
            .open_with_release(&message, viewer.clone(), &timer, Duration::from_secs(60))
            .await;
        state.settle(&result);

        assert_eq!(state, FetchState::Opened);
        assert_eq!(source.requests(), vec!["docs/a b#1.pdf".to_string()]);
        assert_eq!(viewer.log().opened.len(), 1);
    }

    #[tokio::test]
    async fn test_clicks_while_in_flight_are_ignored() {
        let source = MockDocumentSource::new().with_document("report.pdf", b"%PDF".to_vec());
        let fetcher = DocumentFetcher::new(source.clone());
        let viewer = RecordingViewer::new();
        let timer = ManualTimer::new();
        let message = Message::user("hello").with_document("report.pdf");
        let control = DocumentControl::for_message(&message).unwrap();

        let mut state = FetchState::Idle;
        assert!(state.begin());
        let pending =
            fetcher.open_with_release(&message, viewer.clone(), &timer, Duration::from_secs(60));

        // Further clicks land before the first fetch resolves
        assert!(control.is_disabled(&state));
        assert!(!state.begin());
        assert!(!state.begin());

        let result = pending.await;
        state.settle(&result);

        assert_eq!(source.requests().len(), 1);
        assert_eq!(viewer.log().opened.len(), 1);
        assert!(!control.is_disabled(&state));
    }

    #[tokio::test]
    async fn test_opened_document_released_after_delay() {
        let source = MockDocumentSource::new().with_document("report.pdf", b"%PDF".to_vec());
        let fetcher = DocumentFetcher::new(source);
        let viewer = RecordingViewer::new();
        let timer = ManualTimer::new();
        let message = Message::bot("here").with_document("report.pdf");

        fetcher
            .open_with_release(&message, viewer.clone(), &timer, Duration::from_secs(45))
            .await
            .unwrap();

        assert_eq!(timer.pending(), vec![Duration::from_secs(45)]);
        assert_eq!(viewer.live_urls().len(), 1);

        timer.fire_all();
        assert!(viewer.live_urls().is_empty());
    }

    #[tokio::test]
    async fn test_blocked_popup_schedules_nothing() {
        let source = MockDocumentSource::new().with_document("report.pdf", b"%PDF".to_vec());
        let fetcher = DocumentFetcher::new(source);
        let viewer = RecordingViewer::blocking_popups();
        let timer = ManualTimer::new();
        let message = Message::bot("here").with_document("report.pdf");

        let mut state = FetchState::Idle;
        assert!(state.begin());
        let result = fetcher
            .open_with_release(&message, viewer.clone(), &timer, Duration::from_secs(45))
            .await;
        state.settle(&result);

        assert_eq!(state, FetchState::PopupBlocked);
        assert!(timer.pending().is_empty());
        assert!(viewer.live_urls().is_empty());
    }
}

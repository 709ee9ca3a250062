//! # chat-core
//!
//! Host-independent logic behind the chat message view.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        MessageView                            │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌───────────────┐  │
//! │  │   render     │   │ DocumentFetcher  │──▶│ DocumentSource│  │
//! │  │ (markdown or │   │                  │   │  (Strategy)   │  │
//! │  │  plain text) │   │                  │──▶│ DocumentViewer│  │
//! │  └──────────────┘   └──────────────────┘   └───────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! `DocumentSource` is served over HTTP in production and from memory in
//! tests; `DocumentViewer` is the browser in production.

pub mod config;
pub mod control;
pub mod document;
pub mod error;
pub mod message;
pub mod render;
pub mod viewer;

pub use config::ClientConfig;
pub use control::DocumentControl;
pub use document::{
    DocumentFetcher, DocumentSource, FetchedDocument, HttpDocumentSource, MockDocumentSource,
    document_url, encode_document_id, media_type_for,
};
pub use error::{DocumentError, Result};
pub use message::{Message, parse_transcript};
pub use render::{RenderedBody, is_safe_url, render_markdown_to_html, render_message};
pub use viewer::{
    DocumentViewer, FetchState, ManualTimer, ObjectUrlLease, OpenedDocument, RecordingViewer,
    ReleaseTimer,
};

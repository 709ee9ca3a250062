//! Browser Document Viewer
//!
//! Blob object URLs, `window.open`, and the page timer that releases them.

use std::time::Duration;

use chat_core::{DocumentError, DocumentViewer, FetchedDocument, ReleaseTimer, Result};
use leptos::prelude::set_timeout;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

/// Viewer backed by the page's `window`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserViewer;

fn host_error(err: &JsValue) -> DocumentError {
    DocumentError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl DocumentViewer for BrowserViewer {
    fn create_object_url(&self, document: &FetchedDocument) -> Result<String> {
        let bytes = js_sys::Uint8Array::from(document.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(&document.content_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| host_error(&e))?;
        Url::create_object_url_with_blob(&blob).map_err(|e| host_error(&e))
    }

    fn open(&self, url: &str) -> Result<bool> {
        let window = web_sys::window().ok_or_else(|| DocumentError::Host("no window".into()))?;
        let opened = window
            .open_with_url_and_target(url, "_blank")
            .map_err(|e| host_error(&e))?;
        Ok(opened.is_some())
    }

    fn revoke(&self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            tracing::warn!(%url, error = ?e, "failed to revoke object url");
        }
    }
}

/// `setTimeout` on the page's event loop
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl ReleaseTimer for BrowserTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        set_timeout(task, delay);
    }
}

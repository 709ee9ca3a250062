//! Document Viewer Boundary
//!
//! The host side of opening a fetched document: object URLs and new
//! browsing contexts. The browser implementation lives in the web crate.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::document::FetchedDocument;
use crate::error::{DocumentError, Result};

/// Host capability for showing a fetched payload
pub trait DocumentViewer {
    /// Create a temporary URL referencing the payload
    fn create_object_url(&self, document: &FetchedDocument) -> Result<String>;

    /// Open the URL in a new browsing context.
    ///
    /// Returns `Ok(false)` when the host refused (popup blocker).
    fn open(&self, url: &str) -> Result<bool>;

    /// Release a URL created by `create_object_url`
    fn revoke(&self, url: &str);
}

/// Object URL that is revoked when dropped
pub struct ObjectUrlLease<V: DocumentViewer> {
    url: String,
    viewer: V,
}

impl<V: DocumentViewer> ObjectUrlLease<V> {
    pub fn acquire(viewer: V, document: &FetchedDocument) -> Result<Self> {
        let url = viewer.create_object_url(document)?;
        Ok(Self { url, viewer })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }
}

impl<V: DocumentViewer> Drop for ObjectUrlLease<V> {
    fn drop(&mut self) {
        tracing::trace!(url = %self.url, "revoking object url");
        self.viewer.revoke(&self.url);
    }
}

impl<V: DocumentViewer> std::fmt::Debug for ObjectUrlLease<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectUrlLease").field("url", &self.url).finish_non_exhaustive()
    }
}

/// A document that was opened successfully.
///
/// Keep it alive as long as the opened context may still load the URL;
/// dropping it revokes the URL.
#[derive(Debug)]
pub struct OpenedDocument<V: DocumentViewer> {
    pub name: String,
    pub content_type: String,
    pub size: usize,
    lease: ObjectUrlLease<V>,
}

impl<V: DocumentViewer> OpenedDocument<V> {
    pub(crate) fn new(document: &FetchedDocument, lease: ObjectUrlLease<V>) -> Self {
        Self {
            name: document.name.clone(),
            content_type: document.content_type.clone(),
            size: document.bytes.len(),
            lease,
        }
    }

    pub fn url(&self) -> &str {
        self.lease.url()
    }

    /// Revoke the URL now
    pub fn release(self) {
        drop(self);
    }

    /// Hand the document to a timer that revokes its URL after `delay`
    pub fn release_after<T: ReleaseTimer>(self, timer: &T, delay: Duration)
    where
        V: 'static,
    {
        timer.schedule(delay, Box::new(move || self.release()));
    }
}

/// Runs a task once after a delay (a browser timer in production)
pub trait ReleaseTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Timer that holds tasks until fired by hand
#[derive(Clone, Default)]
pub struct ManualTimer {
    tasks: Rc<RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays of the tasks not yet fired
    pub fn pending(&self) -> Vec<Duration> {
        self.tasks.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    /// Run every pending task
    pub fn fire_all(&self) {
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        for (_, task) in tasks {
            task();
        }
    }
}

impl ReleaseTimer for ManualTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push((delay, task));
    }
}

impl std::fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualTimer").field("pending", &self.pending()).finish()
    }
}

/// What the trigger control should currently show
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Opened,
    Failed { message: String, retryable: bool },
    PopupBlocked,
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Whether the last attempt failed in a way worth retrying
    pub fn can_retry(&self) -> bool {
        match self {
            FetchState::Failed { retryable, .. } => *retryable,
            FetchState::PopupBlocked => true,
            _ => false,
        }
    }

    /// Start a fetch on click.
    ///
    /// Returns `false`, leaving the state alone, while a fetch is in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = FetchState::Loading;
        true
    }

    /// Record the outcome of the fetch started by `begin`
    pub fn settle<T>(&mut self, result: &Result<T>) {
        *self = Self::from_result(result);
    }

    /// State for the outcome of a fetch
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => FetchState::Opened,
            Err(DocumentError::PopupBlocked(_)) => FetchState::PopupBlocked,
            Err(DocumentError::NoDocument) => FetchState::Idle,
            Err(e) => FetchState::Failed {
                message: e.user_message(),
                retryable: e.is_retryable(),
            },
        }
    }

    /// User-facing notice, if the state warrants one
    pub fn notice(&self) -> Option<String> {
        match self {
            FetchState::Idle | FetchState::Opened => None,
            FetchState::Loading => Some("Fetching document...".into()),
            FetchState::Failed { message, .. } => Some(message.clone()),
            FetchState::PopupBlocked => {
                Some(DocumentError::PopupBlocked(String::new()).user_message())
            }
        }
    }
}

/// Calls seen by a [`RecordingViewer`]
#[derive(Clone, Debug, Default)]
pub struct ViewerLog {
    pub created: Vec<String>,
    pub opened: Vec<String>,
    pub revoked: Vec<String>,
    /// Content types of the payloads URLs were created for
    pub content_types: Vec<String>,
}

/// In-memory viewer for tests and non-browser hosts
#[derive(Clone, Debug, Default)]
pub struct RecordingViewer {
    log: Rc<RefCell<ViewerLog>>,
    block_popups: bool,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A viewer whose host refuses every new window
    pub fn blocking_popups() -> Self {
        Self {
            block_popups: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> ViewerLog {
        self.log.borrow().clone()
    }

    /// URLs created and not yet revoked
    pub fn live_urls(&self) -> Vec<String> {
        let log = self.log.borrow();
        log.created
            .iter()
            .filter(|url| !log.revoked.contains(url))
            .cloned()
            .collect()
    }
}

impl DocumentViewer for RecordingViewer {
    fn create_object_url(&self, document: &FetchedDocument) -> Result<String> {
        let mut log = self.log.borrow_mut();
        let url = format!("blob:recording/{}", log.created.len() + 1);
        log.created.push(url.clone());
        log.content_types.push(document.content_type.clone());
        Ok(url)
    }

    fn open(&self, url: &str) -> Result<bool> {
        if self.block_popups {
            return Ok(false);
        }
        self.log.borrow_mut().opened.push(url.to_string());
        Ok(true)
    }

    fn revoke(&self, url: &str) {
        self.log.borrow_mut().revoked.push(url.to_string());
    }
}

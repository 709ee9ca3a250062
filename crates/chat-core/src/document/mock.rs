//! Mock Document Source
//!
//! In-memory documents for tests and offline demos.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use super::{DocumentSource, FetchedDocument, document_url};
use crate::error::{DocumentError, Result};

const MOCK_BASE: &str = "mock://documents";

/// Mock source serving a fixed set of documents
#[derive(Clone, Debug, Default)]
pub struct MockDocumentSource {
    /// Document payloads, or the status to fail with
    documents: HashMap<String, std::result::Result<FetchedDocument, u16>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MockDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` under `name`, content type inferred from the name
    pub fn with_document(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let document = FetchedDocument::inferred(name.clone(), bytes);
        self.documents.insert(name, Ok(document));
        self
    }

    /// Answer requests for `name` with a non-success status
    pub fn with_status(mut self, name: impl Into<String>, status: u16) -> Self {
        self.documents.insert(name.into(), Err(status));
        self
    }

    /// Every identifier requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl DocumentSource for MockDocumentSource {
    async fn fetch(&self, id: &str) -> Result<FetchedDocument> {
        self.requests.borrow_mut().push(id.to_string());

        match self.documents.get(id) {
            Some(Ok(document)) => Ok(document.clone()),
            Some(Err(status)) => Err(DocumentError::Status {
                status: *status,
                url: document_url(MOCK_BASE, id),
            }),
            None => Err(DocumentError::Status {
                status: 404,
                url: document_url(MOCK_BASE, id),
            }),
        }
    }
}

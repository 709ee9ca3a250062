//! HTTP Document Source
//!
//! Fetches documents from the model server with `reqwest`. Works in the
//! browser (fetch API) and on native targets.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::{DocumentSource, FetchedDocument, document_url, media_type_for};
use crate::config::ClientConfig;
use crate::error::{DocumentError, Result};

/// Document source backed by the model server's embed endpoint
#[derive(Clone, Debug)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
    base_url: String,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    timeout: Duration,
}

impl HttpDocumentSource {
    /// Create from configuration.
    ///
    /// The base URL is not checked here; a base nothing can be fetched from
    /// surfaces as a `Network` error when a document is requested.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn url_for(&self, id: &str) -> String {
        document_url(&self.base_url, id)
    }
}

#[async_trait(?Send)]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, id: &str) -> Result<FetchedDocument> {
        let url = self.url_for(id);
        tracing::debug!(%url, "requesting document");

        let request = self.client.get(&url);
        #[cfg(not(target_arch = "wasm32"))]
        let request = request.timeout(self.timeout);

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "document request failed");
            return Err(DocumentError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map_or_else(|| media_type_for(id).to_string(), str::to_string);

        let bytes = response.bytes().await?;

        Ok(FetchedDocument::new(id, content_type, bytes.to_vec()))
    }
}

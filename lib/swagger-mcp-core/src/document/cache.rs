use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use super::InterfaceDocument;
use crate::DocumentError;

/// Fetch-once holder of the interface document.
///
/// The first [`get`](Self::get) downloads and parses the document; every later
/// call returns the same value. Concurrent first callers wait on the same
/// fetch instead of racing. A failed fetch is not cached, so the next call
/// tries again.
#[derive(Debug)]
pub struct DocumentCache {
    client: reqwest::Client,
    url: Url,
    document: OnceCell<Arc<InterfaceDocument>>,
    fetches: AtomicUsize,
}

impl DocumentCache {
    /// Creates an empty cache for the document at `url`.
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self {
            client,
            url,
            document: OnceCell::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Returns the document, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Fails when the document cannot be downloaded, when the server answers
    /// with a non-success status, or when the body is not valid JSON.
    pub async fn get(&self) -> Result<Arc<InterfaceDocument>, DocumentError> {
        let document = self.document.get_or_try_init(|| self.fetch()).await?;
        Ok(Arc::clone(document))
    }

    /// Returns the document only if it was already fetched.
    pub fn cached(&self) -> Option<Arc<InterfaceDocument>> {
        self.document.get().cloned()
    }

    /// Number of fetch attempts performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    async fn fetch(&self) -> Result<Arc<InterfaceDocument>, DocumentError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        info!(url = %self.url, "fetching Swagger document");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(DocumentError::Unreachable)?;
        debug!(?response, "...receiving");

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::FetchFailure {
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(DocumentError::Unreachable)?;
        let raw = serde_json::from_str(&body).map_err(DocumentError::ParseFailure)?;

        Ok(Arc::new(InterfaceDocument::new(raw)))
    }
}

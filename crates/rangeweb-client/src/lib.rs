//! Remote transaction source client
//!
//! Defines the [`TransactionSource`] seam consumed by the core session and
//! the HTTP implementation against the configured endpoint. Filtering
//! happens entirely client-side after the fetch; no query parameters are
//! sent.

pub mod error;
pub mod types;

use async_trait::async_trait;

pub use error::ClientError;
pub use types::{Event, EventsEnvelope};

/// Remote source of transaction events
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch the full, unfiltered event list from the source
    async fn fetch_events(&self) -> Result<Vec<Event>, ClientError>;
}

/// HTTP source issuing one GET against a fixed endpoint
pub struct HttpTransactionSource {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpTransactionSource {
    /// Create a new HTTP source for the given endpoint URL
    pub fn new(endpoint: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// The endpoint this source reads from
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionSource {
    async fn fetch_events(&self) -> Result<Vec<Event>, ClientError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed { message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Transaction source returned status {}", status);
            return Err(ClientError::HttpStatus { status: status.as_u16() });
        }

        let envelope = response
            .json::<EventsEnvelope>()
            .await
            .map_err(|e| ClientError::InvalidBody { message: e.to_string() })?;

        log::debug!("Fetched {} event(s) from {}", envelope.events.len(), self.endpoint);
        Ok(envelope.events)
    }
}

// ==================== Tests ====================

//! Page acquisition behind a trait so extraction is testable offline.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use epiwatch_core::config::{CONNECT_TIMEOUT_MS, REQUEST_TIMEOUT_MS, USER_AGENT};

use crate::error::FetchError;

/// Source of the raw schedule page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String, FetchError>;
}

/// Production page source: one bounded HTTP round-trip per extraction.
///
/// The client is built fresh on every call and dropped with it, so no
/// connection state is held across trigger events. Both the connect phase
/// and the full request carry explicit timeouts; expiry surfaces as a
/// [`FetchError::Request`] and is folded into the degraded snapshot by the
/// caller.
pub struct HttpPageSource {
    url: String,
}

impl HttpPageSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self) -> Result<String, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(CONNECT_TIMEOUT_MS))
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::ClientInit(e.to_string()))?;

        debug!(url = %self.url, "fetching schedule page");

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        debug!(bytes = body.len(), "schedule page received");
        Ok(body)
    }
}

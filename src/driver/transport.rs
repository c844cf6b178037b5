//! Fetch transport
//!
//! The driver consumes a transport with GET-with-timeout semantics and
//! keeps exactly one call outstanding at a time. The production transport
//! rides on reqwest; redirects are the transport's business and the
//! effective URL after redirect resolution comes back with the body.

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch failed; the driver swallows all of these
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),
}

/// A successfully fetched document
#[derive(Debug)]
pub struct FetchedPage {
    /// Response body
    pub body: String,

    /// Effective URL after the transport's redirect resolution
    pub final_url: Url,
}

/// GET-with-timeout transport consumed by the driver
pub trait FetchTransport {
    fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Production transport over reqwest
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the transport with its underlying HTTP client
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchTransport for HttpTransport {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(classify)?;

        Ok(FetchedPage { body, final_url })
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error.to_string())
    }
}

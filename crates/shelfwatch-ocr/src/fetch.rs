//! Banner image retrieval.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::OcrError;
use crate::retry::retry_with_backoff;

/// Something that can turn an image URL into its raw bytes.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, OcrError>> + Send;
}

/// Fetches images over HTTP with retry on transient failures.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
    max_retries: u32,
    backoff_base: Duration,
}

impl HttpImageSource {
    /// # Errors
    ///
    /// Returns [`OcrError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, OcrError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base: Duration::from_millis(backoff_base_ms),
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, OcrError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OcrError::RateLimited {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(OcrError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, OcrError> {
        let bytes =
            retry_with_backoff(self.max_retries, self.backoff_base, || self.fetch_once(url))
                .await?;
        tracing::debug!(url, bytes = bytes.len(), "fetched banner image");
        Ok(bytes)
    }
}

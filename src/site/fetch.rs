use async_trait::async_trait;
use std::time::Duration;

/// Outcome of fetching a feed document
pub type FetchResult = Result<String, Box<dyn std::error::Error + Send + Sync>>;

/// Retrieves raw feed documents.
///
/// The discoverer only depends on this trait, so feeds can be served from
/// memory in tests.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the document at `url` as text
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Fetches feeds over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        ::log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        ::log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

use std::time::Duration;

use channelsync_domain::ChannelSyncError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::to_domain;

const DEFAULT_USER_AGENT: &str = concat!("channelsync/", env!("CARGO_PKG_VERSION"));

/// HTTP client with a per-instance request timeout.
///
/// Requests are attempted exactly once. Completion and course-import posts are
/// not idempotent on the remote side, so retries are left to the next sync run.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    ///
    /// Any HTTP response is returned as-is, whatever its status. Only
    /// transport failures become errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ChannelSyncError> {
        let request = builder.build().map_err(to_domain)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(to_domain(err))
            }
        }
    }

    /// Send and read the whole body as text, returning `(status, body)`.
    pub async fn send_for_text(&self, builder: RequestBuilder) -> Result<(u16, String), ChannelSyncError> {
        let response = self.send(builder).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(to_domain)?;
        Ok((status, body))
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpClient, ChannelSyncError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .no_proxy()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(to_domain)?;
        Ok(HttpClient { client })
    }
}

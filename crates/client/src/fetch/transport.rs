//! HTTP transport seam.
//!
//! The fetcher only needs "GET this URL, tell me the status, the body and where
//! the response actually came from". `Transport` captures exactly that so tests
//! can script responses without a network.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use gallery_core::Error;

use super::FetchConfig;

/// Status, body and final URL of one GET.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// URL the body was served from, after redirects.
    pub final_url: String,
    /// Body bytes. Only read for 200 responses.
    pub bytes: Bytes,
}

/// Failures below the HTTP layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timeout: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TransportError::Timeout(err.to_string()) } else { TransportError::Network(err.to_string()) }
    }
}

/// Performs a single HTTP GET.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport.
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build the HTTP client with the configured User-Agent, timeout and redirect limit.
    pub fn new(config: &FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/*,*/*;q=0.8")
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let bytes = if status == 200 { response.bytes().await? } else { Bytes::new() };

        tracing::debug!("fetched {} -> {} status={} ({} bytes)", url, final_url, status, bytes.len());

        Ok(RawResponse { status, final_url, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> ReqwestTransport {
        let config = FetchConfig { timeout: Duration::from_secs(5), ..Default::default() };
        ReqwestTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_ok_returns_body_and_final_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/illustrations"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<html></html>".to_vec()))
            .mount(&server)
            .await;

        let url = format!("{}/illustrations", server.uri());
        let response = transport().get(&url).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.final_url, url);
        assert_eq!(&response.bytes[..], b"<html></html>");
    }

    #[tokio::test]
    async fn test_get_sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "gallery-test/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = FetchConfig { user_agent: "gallery-test/1.0".into(), ..Default::default() };
        let response = ReqwestTransport::new(&config).unwrap().get(&server.uri()).await.unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_get_non_200_skips_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let response = transport().get(&format!("{}/missing", server.uri())).await.unwrap();

        assert_eq!(response.status, 404);
        assert!(response.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_get_reports_redirect_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/illustrations/page/999"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/illustrations"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/illustrations"))
            .respond_with(ResponseTemplate::new(200).set_body_string("first page"))
            .mount(&server)
            .await;

        let response = transport()
            .get(&format!("{}/illustrations/page/999", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.final_url, format!("{}/illustrations", server.uri()));
    }

    #[tokio::test]
    async fn test_get_connection_refused_is_network_error() {
        let server = MockServer::start().await;
        let url = server.uri();
        drop(server);

        let result = transport().get(&url).await;

        assert!(result.is_err());
    }
}

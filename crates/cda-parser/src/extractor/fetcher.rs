use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use super::default::{BASE_URL, FetcherConfig, create_client};
use crate::extractor::error::ExtractorError;

/// Transport used to download pages.
///
/// The resolver only ever issues plain GET requests and needs the raw body.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, ExtractorError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    headers: HeaderMap,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            headers: Self::default_headers(),
        }
    }

    pub fn with_config(config: &FetcherConfig) -> Result<Self, ExtractorError> {
        Ok(Self::new(create_client(config)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("pl-PL,pl;q=0.9,en-US;q=0.5,en;q=0.3"),
        );
        headers.insert(reqwest::header::REFERER, HeaderValue::from_static(BASE_URL));
        headers
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, ExtractorError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| ExtractorError::fetch_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractorError::fetch_failed(
                url,
                format!("server returned status code {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ExtractorError::fetch_failed(url, e))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::default::default_fetcher;

    #[test]
    fn test_default_headers() {
        let headers = HttpFetcher::default_headers();
        assert_eq!(headers.get(reqwest::header::REFERER).unwrap(), BASE_URL);
        assert!(headers.contains_key(reqwest::header::ACCEPT_LANGUAGE));
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_live_page() {
        let fetcher = default_fetcher().unwrap();
        let body = fetcher.fetch(BASE_URL).await.unwrap();
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_failure() {
        let fetcher = default_fetcher().unwrap();
        let err = fetcher.fetch("http://127.0.0.1:9/video/1a").await.unwrap_err();
        assert!(matches!(err, ExtractorError::FetchFailed { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_failure() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(
                    b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let fetcher = default_fetcher().unwrap();
        let url = format!("http://{addr}/video/1a");
        let err = fetcher.fetch(&url).await.unwrap_err();
        match &err {
            ExtractorError::FetchFailed { url: failed, reason } => {
                assert_eq!(failed, &url);
                assert!(reason.contains("404"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_transient());

        server.await.unwrap();
    }
}

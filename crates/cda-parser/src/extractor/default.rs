use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use serde::{Deserialize, Serialize};

use super::error::ExtractorError;
use super::fetcher::HttpFetcher;

pub(crate) const BASE_URL: &str = "https://www.cda.pl";
pub const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// HTTP settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Overall timeout for a single page request
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Proxy configuration (optional)
    pub proxy: Option<ProxyConfig>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_UA.to_owned(),
            proxy: None,
        }
    }
}

pub fn create_client(config: &FetcherConfig) -> Result<Client, ExtractorError> {
    let provider = Arc::new(ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ExtractorError::HttpClient(format!("TLS protocol versions: {e}")))?
        .with_platform_verifier()
        .map_err(|e| ExtractorError::HttpClient(format!("TLS verifier: {e}")))?
        .with_no_client_auth();

    let mut builder = Client::builder()
        .use_preconfigured_tls(tls_config)
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout);

    if let Some(proxy_config) = &config.proxy {
        let mut proxy = reqwest::Proxy::all(&proxy_config.url).map_err(|e| {
            ExtractorError::HttpClient(format!("invalid proxy '{}': {e}", proxy_config.url))
        })?;
        if let (Some(username), Some(password)) = (&proxy_config.username, &proxy_config.password)
        {
            proxy = proxy.basic_auth(username, password);
        }
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ExtractorError::HttpClient(e.to_string()))
}

pub fn default_client() -> Result<Client, ExtractorError> {
    create_client(&FetcherConfig::default())
}

/// Returns an [`HttpFetcher`] with default timeout and user agent.
pub fn default_fetcher() -> Result<HttpFetcher, ExtractorError> {
    Ok(HttpFetcher::new(default_client()?))
}

/// Returns an [`HttpFetcher`] routed through the given proxy.
pub fn fetcher_with_proxy(proxy_config: Option<ProxyConfig>) -> Result<HttpFetcher, ExtractorError> {
    HttpFetcher::with_config(&FetcherConfig {
        proxy: proxy_config,
        ..FetcherConfig::default()
    })
}

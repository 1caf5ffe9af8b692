use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::Result,
    output::{OutputManager, write_output},
};
use cda_parser::{
    extractor::{CdaExtractor, DEFAULT_UA, FetcherConfig, HttpFetcher, ProxyConfig, ResolverConfig},
    media::ResultSet,
};
use std::{path::Path, sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{info, warn};

pub struct CommandExecutor {
    config: AppConfig,
    fetcher: Arc<HttpFetcher>,
}

impl CommandExecutor {
    pub fn new(config: AppConfig, timeout: Duration, proxy: Option<ProxyConfig>) -> Result<Self> {
        let proxy = proxy.or_else(|| {
            config.default_proxy.as_ref().map(|url| ProxyConfig {
                url: url.clone(),
                username: config.default_proxy_username.clone(),
                password: config.default_proxy_password.clone(),
            })
        });

        let fetcher = HttpFetcher::with_config(&FetcherConfig {
            timeout,
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_UA.to_string()),
            proxy,
        })?;

        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
        })
    }

    pub async fn resolve_single(
        &self,
        url: &str,
        resolver: ResolverConfig,
        output_format: OutputFormat,
        output_file: Option<&Path>,
        quality: Option<&str>,
        retries: u32,
    ) -> Result<()> {
        let result = self.resolve_with_retry(url, resolver, retries).await?;

        let output_manager = OutputManager::new(self.config.colored_output);
        let output = output_manager.format_result(&result, &output_format, quality)?;
        write_output(&output, output_file)
    }

    async fn resolve_with_retry(
        &self,
        url: &str,
        resolver: ResolverConfig,
        retries: u32,
    ) -> Result<ResultSet> {
        let extractor = CdaExtractor::new(url, self.fetcher.clone()).with_config(resolver);

        let mut attempt = 0;
        loop {
            match extractor.extract().await {
                Ok(result) => {
                    info!(
                        "Resolved {} stream(s) of type {}",
                        result.urls.len(),
                        result.kind
                    );
                    return Ok(result);
                }
                Err(e) if e.is_transient() && attempt < retries => {
                    let delay = Duration::from_millis(1000 * (1 << attempt.min(6)));
                    warn!(
                        "Attempt {}/{} failed: {}, retrying in {:?}",
                        attempt + 1,
                        retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

use std::sync::Arc;

use tracing::{debug, info};

use super::config::ResolverConfig;
use super::default::default_fetcher;
use super::error::ExtractorError;
use super::fetcher::PageFetcher;
use super::metadata::{MetadataResolver, VideoEntry};
use super::video_id::VideoId;
use crate::decode::FileDecoder;
use crate::media::{Quality, ResultSet, StreamKind, enumerate_qualities, translate_code};

/// Query parameter selecting a rendition on a video page.
const QUALITY_PARAM: &str = "?wersja=";

/// Resolves a video page into direct stream urls.
///
/// Progressive videos need one extra page fetch for every quality other than
/// the default one. Those fetches run one after another and the first failure
/// aborts the whole extraction.
#[derive(Clone)]
pub struct CdaExtractor {
    url: String,
    config: ResolverConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl CdaExtractor {
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            url: url.into(),
            config: ResolverConfig::default(),
            fetcher,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub async fn extract(&self) -> Result<ResultSet, ExtractorError> {
        let id = VideoId::from_page_url(&self.url, self.config.verify_identifier_checksum)?;
        debug!("Extracted video id: {}", id);

        let resolver = MetadataResolver::new(self.fetcher.as_ref());
        let document = resolver.resolve(&self.url, &id).await?;
        let entry = document.entry();

        let kind = entry.stream_kind();
        debug!("Stream kind: {}", kind);
        if kind == StreamKind::Unsupported {
            return Err(ExtractorError::UnsupportedStreamKind);
        }

        let qualities = enumerate_qualities(
            entry.qualities(),
            kind,
            self.config.assume_manifest_auto_quality,
        )?;

        let urls = match kind {
            StreamKind::ProgressiveFile => {
                self.resolve_files(&resolver, &id, entry, &qualities)
                    .await?
            }
            _ => {
                let manifest = entry
                    .manifest_apple()
                    .ok_or(ExtractorError::UnsupportedStreamKind)?;
                info!("Found stream manifest {}", manifest);
                vec![manifest.to_string()]
            }
        };

        Ok(ResultSet::new(kind, qualities, urls))
    }

    async fn resolve_files(
        &self,
        resolver: &MetadataResolver<'_>,
        id: &VideoId,
        entry: VideoEntry<'_>,
        qualities: &[String],
    ) -> Result<Vec<String>, ExtractorError> {
        let decoder = self.config.file_decoder();

        let default_quality = entry
            .quality()
            .and_then(Quality::from_code)
            .ok_or(ExtractorError::MissingDefaultQuality)?;
        let default_index = qualities
            .iter()
            .position(|key| default_quality.matches(key))
            .ok_or_else(|| {
                ExtractorError::DefaultQualityNotFound(default_quality.code().to_string())
            })?;
        debug!("Default quality: {}", default_quality);

        let mut urls = Vec::with_capacity(qualities.len());
        for (index, quality) in qualities.iter().enumerate() {
            let url = if index == default_index {
                let token = entry.file().ok_or(ExtractorError::MissingStreamFile)?;
                decoder.decode(token)
            } else {
                info!(
                    "Resolving quality {} ({}/{})",
                    translate_code(quality).unwrap_or(quality.as_str()),
                    index + 1,
                    qualities.len()
                );
                self.resolve_alternate(resolver, id, quality, &decoder)
                    .await
                    .map_err(|e| ExtractorError::quality_failed(quality.as_str(), e))?
            };
            debug!("Quality {} resolves to {}", quality, url);
            urls.push(url);
        }

        Ok(urls)
    }

    async fn resolve_alternate(
        &self,
        resolver: &MetadataResolver<'_>,
        id: &VideoId,
        quality: &str,
        decoder: &FileDecoder,
    ) -> Result<String, ExtractorError> {
        let url = format!("{}{}{}", self.url, QUALITY_PARAM, quality);
        let document = resolver.resolve(&url, id).await?;
        let token = document
            .entry()
            .file()
            .filter(|token| !token.is_empty())
            .ok_or(ExtractorError::MissingStreamFile)?;
        Ok(decoder.decode(token))
    }
}

/// Resolves `url` with the default HTTP client and settings.
pub async fn resolve(url: &str) -> Result<ResultSet, ExtractorError> {
    let fetcher = Arc::new(default_fetcher()?);
    CdaExtractor::new(url, fetcher).extract().await
}

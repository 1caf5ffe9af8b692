use serde_json::{Map, Value};
use tracing::debug;

use super::document::{PLAYER_DATA_ATTRIBUTE, player_selector, query_attribute};
use super::error::ExtractorError;
use super::fetcher::PageFetcher;
use super::video_id::VideoId;
use crate::media::StreamKind;

/// Parsed player configuration of one page.
#[derive(Debug, Clone)]
pub struct MetadataDocument {
    video: Map<String, Value>,
}

impl MetadataDocument {
    /// Parses the `player_data` JSON and keeps its `video` object.
    pub fn from_player_data(text: &str) -> Result<Self, ExtractorError> {
        let root: Value = serde_json::from_str(text)?;
        match root {
            Value::Object(mut root) => match root.remove("video") {
                Some(Value::Object(video)) => Ok(Self { video }),
                _ => Err(ExtractorError::MissingVideoEntry),
            },
            _ => Err(ExtractorError::MissingVideoEntry),
        }
    }

    /// Locates the player of `id` in a page and parses its configuration.
    pub fn from_html(html: &str, id: &VideoId) -> Result<Self, ExtractorError> {
        let player_data = query_attribute(html, &player_selector(id), PLAYER_DATA_ATTRIBUTE)?;
        Self::from_player_data(&player_data)
    }

    pub fn entry(&self) -> VideoEntry<'_> {
        VideoEntry { video: &self.video }
    }
}

/// Borrowed view of the `video` object.
#[derive(Debug, Clone, Copy)]
pub struct VideoEntry<'a> {
    video: &'a Map<String, Value>,
}

impl<'a> VideoEntry<'a> {
    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.video.get(key).and_then(Value::as_str)
    }

    /// Obfuscated progressive file token.
    pub fn file(&self) -> Option<&'a str> {
        self.str_field("file")
    }

    pub fn manifest_apple(&self) -> Option<&'a str> {
        self.str_field("manifest_apple")
    }

    /// Code of the quality this page renders by default.
    pub fn quality(&self) -> Option<&'a str> {
        self.str_field("quality")
    }

    pub fn qualities(&self) -> Option<&'a Map<String, Value>> {
        self.video.get("qualities").and_then(Value::as_object)
    }

    pub fn stream_kind(&self) -> StreamKind {
        StreamKind::classify(self.file(), self.manifest_apple())
    }
}

/// Fetches a page and turns it into a [`MetadataDocument`].
pub struct MetadataResolver<'a> {
    fetcher: &'a dyn PageFetcher,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn resolve(&self, url: &str, id: &VideoId) -> Result<MetadataDocument, ExtractorError> {
        let body = self.fetcher.fetch(url).await?;
        let document = MetadataDocument::from_html(&String::from_utf8_lossy(&body), id)?;
        debug!("Resolved player data of {} from {}", id, url);
        Ok(document)
    }
}

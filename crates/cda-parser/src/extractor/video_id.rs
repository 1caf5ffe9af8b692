use std::fmt::{self, Display};

use crate::extractor::error::ExtractorError;

/// Identifier of a single video, taken from the last path segment of its page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Derives the id from a page URL.
    ///
    /// With `verify_checksum` the last two characters must be lowercase hex
    /// digits, which holds for every id the site hands out.
    pub fn from_page_url(url: &str, verify_checksum: bool) -> Result<Self, ExtractorError> {
        let (_, id) = url.rsplit_once('/').ok_or_else(|| {
            ExtractorError::MalformedUrl(format!("no path separator in {url}"))
        })?;

        if verify_checksum && !has_hex_suffix(id) {
            return Err(ExtractorError::InvalidIdentifierChecksum(id.to_string()));
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn has_hex_suffix(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() >= 2
        && bytes[bytes.len() - 2..]
            .iter()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

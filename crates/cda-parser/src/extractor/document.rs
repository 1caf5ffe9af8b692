use scraper::{Html, Selector};

use super::error::ExtractorError;
use super::video_id::VideoId;

/// Element id prefix of the embedded player.
const PLAYER_ID_PREFIX: &str = "mediaplayer";
/// Attribute holding the JSON player configuration.
pub const PLAYER_DATA_ATTRIBUTE: &str = "player_data";

/// Builds the selector matching the player container of `id`.
pub fn player_selector(id: &VideoId) -> String {
    let mut selector = String::with_capacity(16 + PLAYER_ID_PREFIX.len() + id.as_str().len());
    selector.push_str("div[id=\"");
    selector.push_str(PLAYER_ID_PREFIX);
    for c in id.as_str().chars() {
        if matches!(c, '"' | '\\') {
            selector.push('\\');
        }
        selector.push(c);
    }
    selector.push_str("\"]");
    selector
}

/// Reads `attribute` from the first element matching `selector`.
pub fn query_attribute(html: &str, selector: &str, attribute: &str) -> Result<String, ExtractorError> {
    let selector = Selector::parse(selector).map_err(|e| {
        ExtractorError::ExtractionFailed(format!("invalid selector {selector}: {e}"))
    })?;

    let document = Html::parse_document(html);
    let element = document.select(&selector).next().ok_or_else(|| {
        ExtractorError::ExtractionFailed("player element not found".to_string())
    })?;

    element
        .value()
        .attr(attribute)
        .map(str::to_owned)
        .ok_or_else(|| {
            ExtractorError::ExtractionFailed(format!("player element has no {attribute} attribute"))
        })
}

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::stream_kind::StreamKind;
use crate::extractor::error::ExtractorError;

/// Key the player uses for adaptive quality selection; never a real rendition.
pub const AUTO_QUALITY: &str = "auto";

/// Renditions the site serves, keyed by the short code used in player data.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quality {
    #[serde(rename = "144p")]
    P144,
    #[serde(rename = "240p")]
    P240,
    #[serde(rename = "vl")]
    VeryLow,
    #[serde(rename = "lq")]
    Low,
    #[serde(rename = "sd")]
    Standard,
    #[serde(rename = "hd")]
    High,
    #[serde(rename = "qhd")]
    QuadHigh,
    #[serde(rename = "uhd")]
    UltraHigh,
}

impl Quality {
    pub const ALL: [Quality; 8] = [
        Quality::P144,
        Quality::P240,
        Quality::VeryLow,
        Quality::Low,
        Quality::Standard,
        Quality::High,
        Quality::QuadHigh,
        Quality::UltraHigh,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Quality::P144 => "144p",
            Quality::P240 => "240p",
            Quality::VeryLow => "vl",
            Quality::Low => "lq",
            Quality::Standard => "sd",
            Quality::High => "hd",
            Quality::QuadHigh => "qhd",
            Quality::UltraHigh => "uhd",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::P144 => "144p",
            Quality::P240 => "240p",
            Quality::VeryLow => "360p",
            Quality::Low => "480p",
            Quality::Standard => "720p",
            Quality::High => "1080p",
            Quality::QuadHigh => "2K",
            Quality::UltraHigh => "4K",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.code() == code)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.label() == label)
    }

    /// Whether `key` names this quality by code or by label.
    pub fn matches(&self, key: &str) -> bool {
        key == self.code() || key == self.label()
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Quality {
    type Err = String;

    /// Accepts either form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| format!("unknown quality: {s}"))
    }
}

/// Short code to display label, e.g. `hd` to `1080p`.
pub fn translate_code(code: &str) -> Option<&'static str> {
    Quality::from_code(code).map(|q| q.label())
}

/// Display label to short code, e.g. `1080p` to `hd`.
pub fn label_to_code(label: &str) -> Option<&'static str> {
    Quality::from_label(label).map(|q| q.code())
}

/// Lists the advertised quality keys, dropping [`AUTO_QUALITY`].
///
/// With `assume_manifest_auto` a manifest is taken to always carry an `auto`
/// entry, so a manifest advertising a single key counts as empty.
pub fn enumerate_qualities(
    qualities: Option<&Map<String, Value>>,
    kind: StreamKind,
    assume_manifest_auto: bool,
) -> Result<Vec<String>, ExtractorError> {
    let qualities = qualities.ok_or(ExtractorError::EmptyQualitySet)?;

    let keys: Vec<String> = qualities
        .keys()
        .filter(|key| key.as_str() != AUTO_QUALITY)
        .cloned()
        .collect();

    let advertised = if kind == StreamKind::AdaptiveManifest && assume_manifest_auto {
        qualities.len().saturating_sub(1)
    } else {
        keys.len()
    };

    if advertised == 0 || keys.is_empty() {
        return Err(ExtractorError::EmptyQualitySet);
    }

    debug!("Advertised qualities ({}): {:?}", advertised, keys);
    Ok(keys)
}

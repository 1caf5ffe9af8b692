use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a video is delivered.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    #[serde(rename = "none")]
    Unsupported,
    /// One progressive file per quality.
    #[serde(rename = "file")]
    ProgressiveFile,
    /// A single HLS playlist covering every quality.
    #[serde(rename = "m3u8")]
    AdaptiveManifest,
}

impl StreamKind {
    pub fn as_str(&self) -> &str {
        match self {
            StreamKind::Unsupported => "none",
            StreamKind::ProgressiveFile => "file",
            StreamKind::AdaptiveManifest => "m3u8",
        }
    }

    /// Exactly one of `file` and `manifest` has to be a non-empty string.
    pub fn classify(file: Option<&str>, manifest: Option<&str>) -> Self {
        let has_file = file.is_some_and(|f| !f.is_empty());
        let has_manifest = manifest.is_some_and(|m| !m.is_empty());

        match (has_file, has_manifest) {
            (true, false) => StreamKind::ProgressiveFile,
            (false, true) => StreamKind::AdaptiveManifest,
            _ => StreamKind::Unsupported,
        }
    }
}

impl Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StreamKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(StreamKind::Unsupported),
            "file" => Ok(StreamKind::ProgressiveFile),
            "m3u8" => Ok(StreamKind::AdaptiveManifest),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            StreamKind::classify(Some("abc"), Some("")),
            StreamKind::ProgressiveFile
        );
        assert_eq!(
            StreamKind::classify(Some(""), Some("xyz")),
            StreamKind::AdaptiveManifest
        );
        assert_eq!(
            StreamKind::classify(Some(""), Some("")),
            StreamKind::Unsupported
        );
        assert_eq!(
            StreamKind::classify(Some("abc"), Some("xyz")),
            StreamKind::Unsupported
        );
    }

    #[test]
    fn test_classify_absent_fields() {
        assert_eq!(StreamKind::classify(Some("abc"), None), StreamKind::ProgressiveFile);
        assert_eq!(StreamKind::classify(None, Some("xyz")), StreamKind::AdaptiveManifest);
        assert_eq!(StreamKind::classify(None, None), StreamKind::Unsupported);
    }

    #[test]
    fn test_wire_names() {
        for kind in [
            StreamKind::Unsupported,
            StreamKind::ProgressiveFile,
            StreamKind::AdaptiveManifest,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<StreamKind>(), Ok(kind));
        }
    }
}

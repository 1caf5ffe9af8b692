use serde::{Deserialize, Serialize};

use super::stream_kind::StreamKind;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
/// Resolved streams of one video.
///
/// For [`StreamKind::ProgressiveFile`] `urls[i]` plays `qualities[i]`. For
/// [`StreamKind::AdaptiveManifest`] `urls` holds the single playlist and
/// `qualities` only lists what the playlist offers.
///
/// # Examples
///
/// ```rust
/// use cda_parser::media::{ResultSet, StreamKind};
///
/// let result = ResultSet::new(
///     StreamKind::ProgressiveFile,
///     vec!["sd".to_string()],
///     vec!["https://vwaw.cda.pl/a.mp4".to_string()],
/// );
/// assert_eq!(
///     result.to_compat_json().unwrap(),
///     r#"{"json_type":"file","qualities":["sd"],"urls":["https://vwaw.cda.pl/a.mp4"]}"#
/// );
/// ```
pub struct ResultSet {
    #[serde(rename = "json_type")]
    pub kind: StreamKind,
    pub qualities: Vec<String>,
    pub urls: Vec<String>,
}

impl ResultSet {
    pub fn new(kind: StreamKind, qualities: Vec<String>, urls: Vec<String>) -> Self {
        debug_assert!(
            kind != StreamKind::ProgressiveFile || qualities.len() == urls.len(),
            "every progressive quality needs exactly one url"
        );
        debug_assert!(
            kind != StreamKind::AdaptiveManifest || urls.len() == 1,
            "a manifest result carries exactly one url"
        );

        Self {
            kind,
            qualities,
            urls,
        }
    }

    /// Pairs each quality with its url. Manifests yield nothing.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        let take = if self.kind == StreamKind::ProgressiveFile {
            self.urls.len()
        } else {
            0
        };
        self.qualities
            .iter()
            .zip(&self.urls)
            .take(take)
            .map(|(q, u)| (q.as_str(), u.as_str()))
    }

    /// Playlist url of an adaptive result.
    pub fn manifest_url(&self) -> Option<&str> {
        match self.kind {
            StreamKind::AdaptiveManifest => self.urls.first().map(String::as_str),
            _ => None,
        }
    }

    /// Compact `{"json_type":..,"qualities":[..],"urls":[..]}` rendering.
    pub fn to_compat_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compat_json_layout() {
        let result = ResultSet::new(
            StreamKind::ProgressiveFile,
            vec!["sd".to_string(), "hd".to_string()],
            vec![
                "https://a.cda.pl/sd.mp4".to_string(),
                "https://a.cda.pl/hd.mp4".to_string(),
            ],
        );
        assert_eq!(
            result.to_compat_json().unwrap(),
            r#"{"json_type":"file","qualities":["sd","hd"],"urls":["https://a.cda.pl/sd.mp4","https://a.cda.pl/hd.mp4"]}"#
        );
        assert_eq!(
            result.files().collect::<Vec<_>>(),
            vec![
                ("sd", "https://a.cda.pl/sd.mp4"),
                ("hd", "https://a.cda.pl/hd.mp4")
            ]
        );
        assert_eq!(result.manifest_url(), None);
    }

    #[test]
    fn test_manifest_result() {
        let result = ResultSet::new(
            StreamKind::AdaptiveManifest,
            vec!["480p".to_string(), "720p".to_string()],
            vec!["https://x.cda.pl/master.m3u8".to_string()],
        );
        assert_eq!(result.manifest_url(), Some("https://x.cda.pl/master.m3u8"));
        assert_eq!(result.files().count(), 0);
        assert_eq!(
            result.to_compat_json().unwrap(),
            r#"{"json_type":"m3u8","qualities":["480p","720p"],"urls":["https://x.cda.pl/master.m3u8"]}"#
        );
    }

    #[test]
    fn test_deserialize_back() {
        let json = r#"{"json_type":"none","qualities":[],"urls":[]}"#;
        let result: ResultSet = serde_json::from_str(json).unwrap();
        assert_eq!(result.kind, StreamKind::Unsupported);
    }
}

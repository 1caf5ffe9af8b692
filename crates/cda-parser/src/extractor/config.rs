use serde::{Deserialize, Serialize};

use crate::decode::{FileDecoder, RotationBackend};

/// Knobs controlling how strictly a page is validated and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Require the last two characters of the video id to be lowercase hex.
    pub verify_identifier_checksum: bool,

    /// Only decode `%XY` escapes with valid hex digits.
    pub strict_percent_decoding: bool,

    /// Assume manifests always advertise an `auto` quality and subtract one
    /// from the quality count without checking for it.
    pub assume_manifest_auto_quality: bool,

    /// Force a rotation backend instead of detecting the best one.
    pub rotation_backend: Option<RotationBackend>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            verify_identifier_checksum: true,
            strict_percent_decoding: true,
            assume_manifest_auto_quality: true,
            rotation_backend: None,
        }
    }
}

impl ResolverConfig {
    /// Skips every optional validation, matching the most permissive behaviour.
    pub fn lenient() -> Self {
        Self {
            verify_identifier_checksum: false,
            strict_percent_decoding: false,
            ..Self::default()
        }
    }

    pub fn with_identifier_checksum(mut self, verify: bool) -> Self {
        self.verify_identifier_checksum = verify;
        self
    }

    pub fn with_strict_percent_decoding(mut self, strict: bool) -> Self {
        self.strict_percent_decoding = strict;
        self
    }

    pub fn with_manifest_auto_quality(mut self, assume: bool) -> Self {
        self.assume_manifest_auto_quality = assume;
        self
    }

    pub fn with_rotation_backend(mut self, backend: Option<RotationBackend>) -> Self {
        self.rotation_backend = backend;
        self
    }

    pub fn file_decoder(&self) -> FileDecoder {
        FileDecoder::new(
            self.strict_percent_decoding,
            self.rotation_backend.unwrap_or_else(RotationBackend::detect),
        )
    }
}

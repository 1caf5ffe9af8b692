use std::borrow::Cow;

use memchr::memmem;
use tracing::debug;

use super::rotation::RotationBackend;

/// Scheme prepended to every decoded file location.
pub const PROTOCOL_PREFIX: &str = "https://";
/// Container extension appended to every decoded file location.
pub const FILE_EXTENSION: &str = ".mp4";

/// Filler injected into the token, deleted in this order.
const NOISE_WORDS: [&[u8]; 8] = [
    b"_XDDD",
    b"_CDA",
    b"_ADC",
    b"_CXD",
    b"_QWE",
    b"_Q5",
    b"_IKSDE",
    // rotated ".cda.mp4"
    b"%5D452%5D%3EAc",
];

// rotated ".2cda.pl" and ".3cda.pl"
const ALIASED_HOSTS: [&[u8]; 2] = [b"%5Da452%5DA%3D", b"%5Db452%5DA%3D"];
// rotated ".cda.pl"
const CANONICAL_HOST: &[u8] = b"%5D452%5DA%3D";

/// Reverses the obfuscation applied to the `file` field of the player data.
///
/// Stages: noise-word removal, host token substitution, percent-decoding and
/// the byte rotation cipher. The decoder never fails; garbage in gives a
/// well-formed but meaningless URL out.
#[derive(Debug, Clone, Copy)]
pub struct FileDecoder {
    strict_escapes: bool,
    backend: RotationBackend,
}

impl Default for FileDecoder {
    fn default() -> Self {
        Self {
            strict_escapes: true,
            backend: RotationBackend::detect(),
        }
    }
}

impl FileDecoder {
    pub fn new(strict_escapes: bool, backend: RotationBackend) -> Self {
        Self {
            strict_escapes,
            backend,
        }
    }

    pub fn backend(&self) -> RotationBackend {
        self.backend
    }

    /// Decodes a `file` token into a direct `https://...mp4` URL.
    pub fn decode(&self, token: &str) -> String {
        let location = self.decode_bytes(token.as_bytes());

        let mut url =
            String::with_capacity(PROTOCOL_PREFIX.len() + location.len() + FILE_EXTENSION.len());
        url.push_str(PROTOCOL_PREFIX);
        // Rotation output is always printable ASCII.
        url.extend(location.iter().map(|&byte| byte as char));
        url.push_str(FILE_EXTENSION);

        debug!(
            "Decoded file token ({} bytes) into {} using {}",
            token.len(),
            url,
            self.backend
        );
        url
    }

    /// Runs all four stages and returns the bare location bytes.
    pub fn decode_bytes(&self, token: &[u8]) -> Vec<u8> {
        let mut buf = token.to_vec();
        remove_noise_words(&mut buf);
        substitute_host_tokens(&mut buf);
        let mut buf = percent_decode(buf, self.strict_escapes);
        self.backend.apply(&mut buf);
        buf
    }
}

/// Deletes every occurrence of each noise word, one word at a time.
///
/// The search restarts from the beginning after each deletion, so an
/// occurrence formed by joining the two sides of a deleted one is removed too.
pub fn remove_noise_words(buf: &mut Vec<u8>) {
    for word in NOISE_WORDS {
        while let Some(pos) = memmem::find(buf, word) {
            buf.drain(pos..pos + word.len());
        }
    }
}

/// Rewrites the aliased host tokens into the canonical one, left to right.
pub fn substitute_host_tokens(buf: &mut Vec<u8>) {
    for alias in ALIASED_HOSTS {
        let mut cursor = 0;
        while let Some(offset) = memmem::find(&buf[cursor..], alias) {
            let pos = cursor + offset;
            buf.splice(pos..pos + alias.len(), CANONICAL_HOST.iter().copied());
            cursor = pos + CANONICAL_HOST.len();
        }
    }
}

/// Collapses `%XY` escapes into single bytes.
///
/// In strict mode only valid hex pairs are decoded and anything else is kept
/// verbatim. In lenient mode any two bytes after `%` are folded with the
/// nibble arithmetic the site's player uses, valid or not. A `%` without two
/// following bytes is always kept.
pub fn percent_decode(buf: Vec<u8>, strict: bool) -> Vec<u8> {
    if strict {
        let decoded = match urlencoding::decode_binary(&buf) {
            Cow::Owned(decoded) => Some(decoded),
            Cow::Borrowed(_) => None,
        };
        return decoded.unwrap_or(buf);
    }

    let mut buf = buf;
    let mut read = 0;
    let mut write = 0;
    while read < buf.len() {
        let byte = buf[read];
        if byte == b'%' && read + 2 < buf.len() {
            buf[write] = (loose_nibble(buf[read + 1]) << 4) | loose_nibble(buf[read + 2]);
            read += 3;
        } else {
            buf[write] = byte;
            read += 1;
        }
        write += 1;
    }
    buf.truncate(write);
    buf
}

#[inline]
fn loose_nibble(c: u8) -> u8 {
    (c & 0x0F).wrapping_add((c >> 6).wrapping_mul(9))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(strict: bool) -> FileDecoder {
        FileDecoder::new(strict, RotationBackend::Scalar)
    }

    #[test]
    fn test_remove_noise_words() {
        let mut buf = b"a_XDDDb_CDAc_Q5d_IKSDEe".to_vec();
        remove_noise_words(&mut buf);
        assert_eq!(buf, b"abcde");
    }

    #[test]
    fn test_remove_noise_words_rejoined_occurrence() {
        // Deleting the inner word leaves another "_XDDD" behind.
        let mut buf = b"_XD_XDDDDD".to_vec();
        remove_noise_words(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_remove_noise_words_extension_marker() {
        let mut buf = b"abc%5D452%5D%3EAc".to_vec();
        remove_noise_words(&mut buf);
        assert_eq!(buf, b"abc");
    }

    #[test]
    fn test_substitute_host_tokens() {
        let mut buf = b"x%5Da452%5DA%3Dy%5Db452%5DA%3Dz".to_vec();
        substitute_host_tokens(&mut buf);
        assert_eq!(buf, b"x%5D452%5DA%3Dy%5D452%5DA%3Dz");
    }

    #[test]
    fn test_substitute_host_tokens_leaves_canonical_alone() {
        let mut buf = CANONICAL_HOST.to_vec();
        substitute_host_tokens(&mut buf);
        assert_eq!(buf, CANONICAL_HOST);
    }

    #[test]
    fn test_percent_decode_strict() {
        assert_eq!(percent_decode(b"%41%zz%4".to_vec(), true), b"A%zz%4");
        assert_eq!(percent_decode(b"plain".to_vec(), true), b"plain");
    }

    #[test]
    fn test_percent_decode_lenient() {
        assert_eq!(percent_decode(b"%41%zz%4".to_vec(), false), b"A3%4");
        assert_eq!(percent_decode(b"%6a%6A".to_vec(), false), b"jj");
        assert_eq!(percent_decode(b"%".to_vec(), false), b"%");
    }

    #[test]
    fn test_decode_full_token() {
        let token = "GH2H_XDDD%5Da452%5DA%3D^G:_CDA56@^234";
        assert_eq!(
            decoder(true).decode(token),
            "https://vwaw.cda.pl/video/abc.mp4"
        );
    }

    #[test]
    fn test_decode_strips_extension_marker() {
        let token = "GH2H%5Db452%5DA%3D^G:56@^234%5D452%5D%3EAc";
        assert_eq!(
            decoder(false).decode(token),
            "https://vwaw.cda.pl/video/abc.mp4"
        );
    }

    #[test]
    fn test_decode_degenerate_tokens() {
        assert_eq!(decoder(true).decode(""), "https://.mp4");
        assert_eq!(decoder(true).decode("A"), "https://p.mp4");
        assert_eq!(decoder(true).decode("%4"), "https://Tc.mp4");
    }

    #[test]
    fn test_escape_mode_changes_output() {
        assert_eq!(decoder(true).decode("%41%zz%4"), "https://pTKKTc.mp4");
        assert_eq!(decoder(false).decode("%41%zz%4"), "https://pbTc.mp4");
    }

    #[test]
    fn test_decode_is_deterministic_across_backends() {
        let token = "GH2H_XDDD%5Da452%5DA%3D^G:_CDA56@^234_QWE~~~~~~~~~~~~~~~~~~~~~~~~~~~~";
        let reference = decoder(true).decode(token);
        assert_eq!(decoder(true).decode(token), reference);

        for backend in RotationBackend::ALL {
            assert_eq!(FileDecoder::new(true, backend).decode(token), reference);
        }
    }
}

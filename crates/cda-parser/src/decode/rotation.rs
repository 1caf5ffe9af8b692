use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::simd;

/// Lowest byte the rotation can produce (`!`).
pub const ROTATION_BASE: u8 = 33;
/// Offset added before reducing.
pub const ROTATION_OFFSET: u8 = 14;
/// Size of the printable window the cipher rotates within.
pub const ROTATION_MODULUS: u8 = 94;

/// Rotates a single byte: `33 + ((b + 14) mod 94)` on the unsigned value of `b`.
///
/// This is the reference every accelerated backend is tested against.
#[inline]
pub const fn rotate(byte: u8) -> u8 {
    ROTATION_BASE + ((byte as u16 + ROTATION_OFFSET as u16) % ROTATION_MODULUS as u16) as u8
}

/// Scalar reference implementation over a whole buffer.
#[inline]
pub fn rotate_scalar(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte = rotate(*byte);
    }
}

/// Rotates `buf` in place with the best backend this CPU supports.
#[inline]
pub fn rotate_in_place(buf: &mut [u8]) {
    RotationBackend::detect().apply(buf);
}

static DETECTED_BACKEND: LazyLock<RotationBackend> = LazyLock::new(|| {
    let backend = RotationBackend::probe();
    debug!("Selected rotation backend: {}", backend);
    backend
});

/// Implementation strategy for the rotation stage.
///
/// Every backend produces output byte-identical to [`rotate`]. Backends that
/// the running CPU cannot execute silently fall back to the scalar loop.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RotationBackend {
    /// One byte at a time.
    Scalar,
    /// Eight bytes per `u64` word, no intrinsics.
    Swar,
    /// 16 bytes per step (x86_64).
    Sse2,
    /// 32 bytes per step (x86_64, runtime detected).
    Avx2,
    /// 16 bytes per step (aarch64).
    Neon,
}

impl RotationBackend {
    pub const ALL: [RotationBackend; 5] = [
        RotationBackend::Scalar,
        RotationBackend::Swar,
        RotationBackend::Sse2,
        RotationBackend::Avx2,
        RotationBackend::Neon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RotationBackend::Scalar => "scalar",
            RotationBackend::Swar => "swar",
            RotationBackend::Sse2 => "sse2",
            RotationBackend::Avx2 => "avx2",
            RotationBackend::Neon => "neon",
        }
    }

    /// Whether the running CPU can execute this backend natively.
    pub fn is_supported(self) -> bool {
        match self {
            RotationBackend::Scalar | RotationBackend::Swar => true,
            RotationBackend::Sse2 => {
                #[cfg(target_arch = "x86_64")]
                {
                    is_x86_feature_detected!("sse2")
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    false
                }
            }
            RotationBackend::Avx2 => {
                #[cfg(target_arch = "x86_64")]
                {
                    is_x86_feature_detected!("avx2")
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    false
                }
            }
            RotationBackend::Neon => {
                #[cfg(target_arch = "aarch64")]
                {
                    std::arch::is_aarch64_feature_detected!("neon")
                }
                #[cfg(not(target_arch = "aarch64"))]
                {
                    false
                }
            }
        }
    }

    /// All backends usable on this machine, in declaration order.
    pub fn available() -> Vec<RotationBackend> {
        Self::ALL
            .into_iter()
            .filter(|backend| backend.is_supported())
            .collect()
    }

    /// Best supported backend, detected once per process.
    pub fn detect() -> RotationBackend {
        *DETECTED_BACKEND
    }

    fn probe() -> RotationBackend {
        [
            RotationBackend::Avx2,
            RotationBackend::Sse2,
            RotationBackend::Neon,
        ]
        .into_iter()
        .find(|backend| backend.is_supported())
        .unwrap_or(RotationBackend::Swar)
    }

    /// Rotates `buf` in place using this backend.
    pub fn apply(self, buf: &mut [u8]) {
        match self {
            RotationBackend::Scalar => rotate_scalar(buf),
            RotationBackend::Swar => simd::rotate_swar(buf),
            RotationBackend::Sse2 => {
                #[cfg(target_arch = "x86_64")]
                {
                    if self.is_supported() {
                        // SAFETY: sse2 support was checked at runtime.
                        unsafe { simd::rotate_sse2(buf) };
                        return;
                    }
                }
                rotate_scalar(buf)
            }
            RotationBackend::Avx2 => {
                #[cfg(target_arch = "x86_64")]
                {
                    if self.is_supported() {
                        // SAFETY: avx2 support was checked at runtime.
                        unsafe { simd::rotate_avx2(buf) };
                        return;
                    }
                }
                rotate_scalar(buf)
            }
            RotationBackend::Neon => {
                #[cfg(target_arch = "aarch64")]
                {
                    if self.is_supported() {
                        // SAFETY: neon support was checked at runtime.
                        unsafe { simd::rotate_neon(buf) };
                        return;
                    }
                }
                rotate_scalar(buf)
            }
        }
    }
}

impl Display for RotationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RotationBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scalar" => Ok(RotationBackend::Scalar),
            "swar" => Ok(RotationBackend::Swar),
            "sse2" => Ok(RotationBackend::Sse2),
            "avx2" => Ok(RotationBackend::Avx2),
            "neon" => Ok(RotationBackend::Neon),
            other => Err(format!("unknown rotation backend: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_byte() -> Vec<u8> {
        (0..=255u8).collect()
    }

    #[test]
    fn test_rotate_known_values() {
        assert_eq!(rotate(b'A'), b'p');
        assert_eq!(rotate(b'z'), b'K');
        assert_eq!(rotate(0), 47);
        assert_eq!(rotate(79), 126);
        assert_eq!(rotate(80), 33);
        assert_eq!(rotate(174), 33);
        assert_eq!(rotate(255), 114);
    }

    #[test]
    fn test_rotate_stays_printable() {
        for byte in every_byte() {
            let rotated = rotate(byte);
            assert!((33..=126).contains(&rotated), "{byte} -> {rotated}");
        }
    }

    #[test]
    fn test_every_backend_matches_reference_for_every_byte() {
        let expected: Vec<u8> = every_byte().into_iter().map(rotate).collect();

        for backend in RotationBackend::ALL {
            let mut buf = every_byte();
            backend.apply(&mut buf);
            assert_eq!(buf, expected, "backend {backend} diverged");
        }
    }

    #[test]
    fn test_every_backend_handles_tails() {
        // Lengths around the 8/16/32 byte steps, starting at every offset.
        let source: Vec<u8> = (0..400u32).map(|i| (i * 37 % 256) as u8).collect();

        for backend in RotationBackend::available() {
            for len in 0..=200 {
                for start in [0, 1, 7, 13] {
                    let mut actual = source[start..start + len].to_vec();
                    let mut expected = actual.clone();
                    rotate_scalar(&mut expected);
                    backend.apply(&mut actual);
                    assert_eq!(actual, expected, "backend {backend}, len {len}, start {start}");
                }
            }
        }
    }

    #[test]
    fn test_detected_backend_is_supported() {
        let backend = RotationBackend::detect();
        assert!(backend.is_supported());
        assert!(RotationBackend::available().contains(&backend));
    }

    #[test]
    fn test_backend_names_round_trip() {
        for backend in RotationBackend::ALL {
            assert_eq!(backend.as_str().parse::<RotationBackend>(), Ok(backend));
        }
        assert!("mmx".parse::<RotationBackend>().is_err());
    }

    #[test]
    fn test_rotate_in_place() {
        let mut buf = b"Az".to_vec();
        rotate_in_place(&mut buf);
        assert_eq!(buf, b"pK");
    }
}

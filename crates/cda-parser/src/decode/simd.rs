//! Vectorized rotation kernels.
//!
//! All kernels compute `33 + ((b + 14) mod 94)` on unsigned bytes without
//! widening: for `b < 80` the result is `b + 47`, for `80 <= b < 174` it is
//! `b + 47 - 94` and for `b >= 174` it is `b + 47 - 188`, all modulo 256.
//! The two thresholds are unsigned comparisons, so bytes >= 0x80 rotate
//! exactly like the scalar reference.

use super::rotation::rotate_scalar;

/// `ROTATION_BASE + ROTATION_OFFSET`
const SHIFT: u8 = 47;
/// First byte value whose shifted sum reaches the modulus.
const FIRST_WRAP: u8 = 80;
/// First byte value whose shifted sum reaches twice the modulus.
const SECOND_WRAP: u8 = 174;
const MODULUS: u8 = 94;

const LANES: u64 = 0x0101_0101_0101_0101;
const HIGH: u64 = 0x8080_8080_8080_8080;

#[inline(always)]
const fn splat(byte: u8) -> u64 {
    LANES * byte as u64
}

/// `0x01` in every lane where `x >= y` (unsigned), `0x00` elsewhere.
#[inline(always)]
fn lanes_ge(x: u64, y: u64) -> u64 {
    // 128 + x_low - y_low never borrows across lanes.
    let diff = (x | HIGH) - (y & !HIGH);
    let ge = (x & !y) | (!(x ^ y) & diff);
    (ge & HIGH) >> 7
}

#[inline(always)]
fn lanes_add(x: u64, y: u64) -> u64 {
    ((x & !HIGH) + (y & !HIGH)) ^ ((x ^ y) & HIGH)
}

#[inline(always)]
fn lanes_sub(x: u64, y: u64) -> u64 {
    ((x | HIGH) - (y & !HIGH)) ^ ((x ^ !y) & HIGH)
}

#[inline(always)]
fn rotate_word(word: u64) -> u64 {
    // Each lane holds 0, 1 or 2 before the multiply, so no carries.
    let wraps = lanes_ge(word, splat(FIRST_WRAP)) + lanes_ge(word, splat(SECOND_WRAP));
    lanes_sub(lanes_add(word, splat(SHIFT)), wraps * MODULUS as u64)
}

/// Portable kernel working on eight bytes packed into a `u64`.
pub(crate) fn rotate_swar(buf: &mut [u8]) {
    let mut chunks = buf.chunks_exact_mut(8);
    for chunk in &mut chunks {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        let rotated = rotate_word(u64::from_le_bytes(word));
        chunk.copy_from_slice(&rotated.to_le_bytes());
    }
    rotate_scalar(chunks.into_remainder());
}

/// # Safety
///
/// The caller must ensure the CPU supports SSE2.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn rotate_sse2(buf: &mut [u8]) {
    use std::arch::x86_64::*;

    let mut chunks = buf.chunks_exact_mut(16);
    for chunk in &mut chunks {
        let ptr = chunk.as_mut_ptr() as *mut __m128i;
        unsafe {
            let data = _mm_loadu_si128(ptr);
            let modulus = _mm_set1_epi8(MODULUS as i8);

            // max(data, t) == data  <=>  data >= t, unsigned
            let first = _mm_cmpeq_epi8(_mm_max_epu8(data, _mm_set1_epi8(FIRST_WRAP as i8)), data);
            let second =
                _mm_cmpeq_epi8(_mm_max_epu8(data, _mm_set1_epi8(SECOND_WRAP as i8)), data);
            let correction = _mm_add_epi8(
                _mm_and_si128(first, modulus),
                _mm_and_si128(second, modulus),
            );

            let rotated = _mm_sub_epi8(_mm_add_epi8(data, _mm_set1_epi8(SHIFT as i8)), correction);
            _mm_storeu_si128(ptr, rotated);
        }
    }
    rotate_scalar(chunks.into_remainder());
}

/// # Safety
///
/// The caller must ensure the CPU supports AVX2.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn rotate_avx2(buf: &mut [u8]) {
    use std::arch::x86_64::*;

    let mut chunks = buf.chunks_exact_mut(32);
    for chunk in &mut chunks {
        let ptr = chunk.as_mut_ptr() as *mut __m256i;
        unsafe {
            let data = _mm256_loadu_si256(ptr);
            let modulus = _mm256_set1_epi8(MODULUS as i8);

            let first = _mm256_cmpeq_epi8(
                _mm256_max_epu8(data, _mm256_set1_epi8(FIRST_WRAP as i8)),
                data,
            );
            let second = _mm256_cmpeq_epi8(
                _mm256_max_epu8(data, _mm256_set1_epi8(SECOND_WRAP as i8)),
                data,
            );
            let correction = _mm256_add_epi8(
                _mm256_and_si256(first, modulus),
                _mm256_and_si256(second, modulus),
            );

            let rotated = _mm256_sub_epi8(
                _mm256_add_epi8(data, _mm256_set1_epi8(SHIFT as i8)),
                correction,
            );
            _mm256_storeu_si256(ptr, rotated);
        }
    }
    // Up to 31 bytes left; let SSE2 take the next 16.
    let remainder = chunks.into_remainder();
    unsafe { rotate_sse2(remainder) };
}

/// # Safety
///
/// The caller must ensure the CPU supports NEON.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub(crate) unsafe fn rotate_neon(buf: &mut [u8]) {
    use std::arch::aarch64::*;

    let mut chunks = buf.chunks_exact_mut(16);
    for chunk in &mut chunks {
        unsafe {
            let data = vld1q_u8(chunk.as_ptr());
            let modulus = vdupq_n_u8(MODULUS);

            let first = vandq_u8(vcgeq_u8(data, vdupq_n_u8(FIRST_WRAP)), modulus);
            let second = vandq_u8(vcgeq_u8(data, vdupq_n_u8(SECOND_WRAP)), modulus);

            let rotated = vsubq_u8(vaddq_u8(data, vdupq_n_u8(SHIFT)), vaddq_u8(first, second));
            vst1q_u8(chunk.as_mut_ptr(), rotated);
        }
    }
    rotate_scalar(chunks.into_remainder());
}

pub mod pipeline;
pub mod rotation;
mod simd;

pub use pipeline::{FILE_EXTENSION, FileDecoder, PROTOCOL_PREFIX};
pub use rotation::{RotationBackend, rotate, rotate_in_place, rotate_scalar};

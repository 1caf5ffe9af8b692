pub mod quality;
pub mod result_set;
pub mod stream_kind;

pub use quality::{Quality, enumerate_qualities, label_to_code, translate_code};
pub use result_set::ResultSet;
pub use stream_kind::StreamKind;

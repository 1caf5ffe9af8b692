//! Resolves cda.pl video pages into directly playable stream urls.
//!
//! A page embeds its player configuration as JSON. Progressive videos carry an
//! obfuscated `file` token per quality, which [`decode::FileDecoder`] turns
//! back into an `https://...mp4` url. Adaptive videos carry a single HLS
//! playlist instead.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), cda_parser::extractor::ExtractorError> {
//! let result = cda_parser::extractor::resolve("https://www.cda.pl/video/1940374795").await?;
//! for (quality, url) in result.files() {
//!     println!("{quality}: {url}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or
//! [Apache-2.0](./LICENSE.Apache-2.0) license. You can choose between one of
//! them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`

pub mod decode;
pub mod extractor;
pub mod media;

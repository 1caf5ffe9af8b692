mod default;
pub mod config;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod metadata;
pub mod resolver;
pub mod video_id;

pub use config::ResolverConfig;
pub use default::{
    DEFAULT_UA, FetcherConfig, ProxyConfig, create_client, default_client, default_fetcher,
    fetcher_with_proxy,
};
pub use error::ExtractorError;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use metadata::{MetadataDocument, MetadataResolver, VideoEntry};
pub use resolver::{CdaExtractor, resolve};
pub use video_id::VideoId;

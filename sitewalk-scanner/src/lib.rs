pub mod barrier;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod result;

pub use barrier::CompletionBarrier;
pub use config::{CrawlConfig, MAX_DEPTH};
pub use crawler::{CrawlOutcome, Crawler, ProgressCallback};
pub use error::ScanError;
pub use extract::{LinkExtractor, MAX_LINKS_PER_PAGE};
pub use fetch::{FetchFn, HttpFetcher};
pub use result::{PageRecord, SiteMap};

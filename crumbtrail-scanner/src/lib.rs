pub mod analyzer;
pub mod breadcrumb;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod frontier;
pub mod hierarchy;
pub mod links;
pub mod result;

pub use crawler::{CrawlConfig, Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use result::{CrawlOutput, CrawlProgress, LinkRecord, PageRecord};
pub use tokio_util::sync::CancellationToken;

pub mod aggregator;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod registry;
pub mod site;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use aggregator::{
    Aggregator, NoopReporter, ProgressFn, SearchEvent, SearchReporter, TracingSearchReporter,
};
pub use config::{AggregatorConfig, DEFAULT_USER_AGENT};
pub use directory::{DirectoryEntry, directory, directory_for};
pub use error::AppError;
pub use models::{ScrapedJob, SearchReport, SiteReport, SiteStatus};
pub use registry::SiteRegistry;
pub use site::{SiteConfig, SiteRegion, SiteSelectors, builtin_sites};
pub use traits::{Fetcher, ListingParser};

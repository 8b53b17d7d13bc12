use std::future::Future;

use crate::error::AppError;
use crate::models::ScrapedJob;
use crate::site::SiteConfig;

/// Fetches raw HTML from a URL.
///
/// Failures are returned, never masked as an empty page, so that an
/// unreachable site can be told apart from one with no results.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Extracts job listings from a site's search results page.
pub trait ListingParser: Send + Sync + Clone {
    /// Returns one [`ScrapedJob`] per listing element matched by the site's
    /// `listing` selector. A full selector miss is an empty list, not an error.
    fn parse(&self, site: &SiteConfig, html: &str) -> Result<Vec<ScrapedJob>, AppError>;
}

//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests. State lives in
//! `Arc<Mutex<_>>` so clones share it and tests can assert on recorded calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::ScrapedJob;
use crate::site::{SiteConfig, SiteRegion, SiteSelectors};
use crate::traits::{Fetcher, ListingParser};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// What a [`MockFetcher`] route answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Html(String),
    NetworkError(String),
    HttpStatus(u16),
    /// Never completes.
    Hang,
}

#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    response: MockResponse,
    delay: Duration,
}

/// Fetcher that answers by URL substring match.
///
/// The first route whose pattern is contained in the requested URL wins.
/// Unmatched URLs get an empty page.
#[derive(Clone, Default)]
pub struct MockFetcher {
    routes: Arc<Mutex<Vec<Route>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, pattern: &str, response: MockResponse) -> Self {
        self.route_delayed(pattern, response, Duration::ZERO)
    }

    pub fn html(self, pattern: &str, html: impl Into<String>) -> Self {
        self.route(pattern, MockResponse::Html(html.into()))
    }

    /// Answer after `delay`, to control settlement order.
    pub fn route_delayed(self, pattern: &str, response: MockResponse, delay: Duration) -> Self {
        self.routes.lock().unwrap().push(Route {
            pattern: pattern.to_string(),
            response,
            delay,
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());

        let route = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|r| url.contains(&r.pattern))
            .cloned();

        let Some(route) = route else {
            return Ok(String::new());
        };

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }

        match route.response {
            MockResponse::Html(html) => Ok(html),
            MockResponse::NetworkError(msg) => Err(AppError::NetworkError(msg)),
            MockResponse::HttpStatus(code) => {
                Err(AppError::HttpError(format!("HTTP {code} for {url}")))
            }
            MockResponse::Hang => std::future::pending().await,
        }
    }
}

// ---------------------------------------------------------------------------
// MockParser
// ---------------------------------------------------------------------------

/// Parser for a line-based fixture format: each non-blank `title|href` line
/// is one listing. Lines starting with `#` are page chrome and yield nothing.
/// A line reading `!malformed` makes the parse fail.
#[derive(Clone, Default)]
pub struct MockParser;

impl ListingParser for MockParser {
    fn parse(&self, site: &SiteConfig, html: &str) -> Result<Vec<ScrapedJob>, AppError> {
        let mut jobs = Vec::new();
        for line in html
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
        {
            if line == "!malformed" {
                return Err(AppError::Generic(format!("malformed markup from {}", site.name)));
            }
            let (title, href) = line.split_once('|').unwrap_or((line, ""));
            jobs.push(ScrapedJob::new(
                title.trim().to_string(),
                site.resolve_link(href),
                site.label.clone(),
            ));
        }
        Ok(jobs)
    }
}

/// Render `n` listings in the [`MockParser`] line format.
pub fn mock_listings(prefix: &str, n: usize) -> String {
    (1..=n)
        .map(|i| format!("{prefix} {i}|/vaga/{i}\n"))
        .collect()
}

// ---------------------------------------------------------------------------
// Site builders
// ---------------------------------------------------------------------------

/// A valid site config rooted at `origin`, with generic selectors:
/// `.job` listing, `.title`, `.company`, `.location`, link `a`.
pub fn sample_site(name: &str, origin: &str) -> SiteConfig {
    SiteConfig {
        name: name.to_string(),
        label: name.to_uppercase(),
        origin: origin.to_string(),
        search_url: format!("{origin}/search/{name}?q={{query}}"),
        selectors: SiteSelectors {
            listing: ".job".into(),
            title: ".title".into(),
            company: Some(".company".into()),
            location: Some(".location".into()),
            link: "a".into(),
            description: None,
            salary: None,
            posted_date: None,
        },
        region: SiteRegion::International,
    }
}

//! Declarative site adapters.
//!
//! A site adapter is a search URL template, an origin for resolving relative
//! links, and a set of CSS selectors. Every site goes through the same
//! fetch-and-parse path in the aggregator; adding a site means adding a
//! [`SiteConfig`], not code.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

/// Placeholder in [`SiteConfig::search_url`] replaced by the encoded search term.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Which group a site belongs to on the admin search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteRegion {
    /// Portuguese job boards.
    Domestic,
    #[default]
    International,
}

impl SiteRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteRegion::Domestic => "domestic",
            SiteRegion::International => "international",
        }
    }
}

impl std::fmt::Display for SiteRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CSS selectors used to pull listings out of a results page.
///
/// `listing` matches one element per job; every other selector is evaluated
/// inside that element and only its first match is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSelectors {
    pub listing: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Element carrying the `href` of the detail page.
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<String>,
}

/// One external job site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Stable registry key, e.g. `net-empregos`.
    pub name: String,
    /// Label written into [`ScrapedJob::source`](crate::models::ScrapedJob::source).
    pub label: String,
    /// Scheme + host used to absolutize relative links.
    pub origin: String,
    /// Search URL with a `{query}` placeholder.
    pub search_url: String,
    pub selectors: SiteSelectors,
    #[serde(default)]
    pub region: SiteRegion,
}

impl SiteConfig {
    /// Build the first-page search URL for `term`.
    ///
    /// Everything except ASCII alphanumerics and `-_.~` is percent-encoded
    /// (space becomes `%20`, not `+`), so the term is safe in both the path
    /// and the query string. This is stricter than `encodeURIComponent`,
    /// which leaves `!'()*` alone; servers decode both forms the same.
    pub fn search_url_for(&self, term: &str) -> String {
        let encoded = urlencoding::encode(term);
        self.search_url.replace(QUERY_PLACEHOLDER, &encoded)
    }

    /// Rewrite a scraped `href` to an absolute URL against the site origin.
    ///
    /// Absolute links are returned unchanged, an empty href stays empty, and
    /// an href that cannot be joined is returned as-is.
    pub fn resolve_link(&self, href: &str) -> String {
        let href = href.trim();
        if href.is_empty() {
            return String::new();
        }
        match Url::parse(&self.origin).and_then(|base| base.join(href)) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::debug!(site = %self.name, %href, error = %e, "Could not resolve link");
                href.to_string()
            }
        }
    }

    /// Check that the configuration is usable before any request is made.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.name.chars().any(char::is_whitespace) {
            return Err(AppError::ConfigError(format!(
                "Site name '{}' must be non-empty and contain no whitespace",
                self.name
            )));
        }
        if self.label.trim().is_empty() {
            return Err(AppError::ConfigError(format!(
                "Site {} has an empty label",
                self.name
            )));
        }

        let origin = Url::parse(&self.origin).map_err(|e| {
            AppError::ConfigError(format!(
                "Site {} has an invalid origin '{}': {e}",
                self.name, self.origin
            ))
        })?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(AppError::ConfigError(format!(
                "Site {} origin must be http or https, got '{}'",
                self.name,
                origin.scheme()
            )));
        }

        if !self.search_url.contains(QUERY_PLACEHOLDER) {
            return Err(AppError::ConfigError(format!(
                "Site {} search_url is missing the {QUERY_PLACEHOLDER} placeholder",
                self.name
            )));
        }
        Url::parse(&self.search_url_for("jobs")).map_err(|e| {
            AppError::ConfigError(format!(
                "Site {} search_url '{}' is not a valid URL: {e}",
                self.name, self.search_url
            ))
        })?;

        let required = [
            ("listing", &self.selectors.listing),
            ("title", &self.selectors.title),
            ("link", &self.selectors.link),
        ];
        for (field, selector) in required {
            if selector.trim().is_empty() {
                return Err(AppError::ConfigError(format!(
                    "Site {} has an empty {field} selector",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

fn site(
    name: &str,
    label: &str,
    origin: &str,
    search_url: &str,
    region: SiteRegion,
    [listing, title, company, location, link]: [&str; 5],
) -> SiteConfig {
    SiteConfig {
        name: name.to_string(),
        label: label.to_string(),
        origin: origin.to_string(),
        search_url: search_url.to_string(),
        selectors: SiteSelectors {
            listing: listing.to_string(),
            title: title.to_string(),
            company: Some(company.to_string()),
            location: Some(location.to_string()),
            link: link.to_string(),
            description: None,
            salary: None,
            posted_date: None,
        },
        region,
    }
}

/// The four sites searched by default: two Portuguese job boards, a
/// professional network and a job aggregator.
pub fn builtin_sites() -> Vec<SiteConfig> {
    vec![
        site(
            "net-empregos",
            "Net Empregos",
            "https://www.net-empregos.com",
            "https://www.net-empregos.com/pesquisa-empregos.asp?chave={query}",
            SiteRegion::Domestic,
            [".job-item", ".job-title", ".company-name", ".job-location", "a"],
        ),
        site(
            "sapo-emprego",
            "SAPO Emprego",
            "https://emprego.sapo.pt",
            "https://emprego.sapo.pt/empregos/{query}",
            SiteRegion::Domestic,
            [".job-listing", ".job-title", ".company", ".location", "a"],
        ),
        site(
            "linkedin",
            "LinkedIn",
            "https://www.linkedin.com",
            "https://www.linkedin.com/jobs/search?keywords={query}",
            SiteRegion::International,
            [
                ".job-card-container",
                ".job-card-list__title",
                ".job-card-container__company-name",
                ".job-card-container__metadata-item",
                "a",
            ],
        ),
        site(
            "indeed",
            "Indeed",
            "https://www.indeed.com",
            "https://www.indeed.com/jobs?q={query}",
            SiteRegion::International,
            [
                ".job_seen_beacon",
                ".jobTitle",
                ".companyName",
                ".companyLocation",
                "a",
            ],
        ),
    ]
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One listing found on one external site.
///
/// Ephemeral: built fresh on every search and never persisted. There is no
/// identity key, so the same posting seen on two sites yields two records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedJob {
    /// Empty when the title selector misses.
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    /// Absolute URL of the detail page, or empty when the link selector misses.
    pub url: String,
    /// Fixed label of the site adapter that produced this record.
    pub source: String,
    pub description: Option<String>,
    pub salary: Option<String>,
    pub posted_date: Option<String>,
}

impl ScrapedJob {
    pub fn new(title: String, url: String, source: String) -> Self {
        Self {
            title,
            company: None,
            location: None,
            url,
            source,
            description: None,
            salary: None,
            posted_date: None,
        }
    }
}

/// How a single site adapter settled during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    /// Page fetched and at least one listing extracted.
    Completed,
    /// Page fetched, zero listings matched.
    Empty,
    /// Fetch or parse error.
    Failed,
    /// The adapter exceeded the per-site timeout.
    TimedOut,
    /// The search was cancelled before this adapter settled.
    Cancelled,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Completed => "completed",
            SiteStatus::Empty => "empty",
            SiteStatus::Failed => "failed",
            SiteStatus::TimedOut => "timed_out",
            SiteStatus::Cancelled => "cancelled",
        }
    }

    /// True when the site could not be searched (as opposed to returning nothing).
    pub fn is_failure(&self) -> bool {
        matches!(self, SiteStatus::Failed | SiteStatus::TimedOut)
    }
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-site summary of one search.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    /// Registry name of the site (e.g. `net-empregos`).
    pub site: String,
    pub status: SiteStatus,
    /// Number of jobs this site contributed.
    pub jobs: usize,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Result of one aggregated search across all configured sites.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub search_id: Uuid,
    pub term: String,
    /// Jobs in site-settlement order.
    pub jobs: Vec<ScrapedJob>,
    /// Site reports in settlement order; cancelled sites are appended last.
    pub sites: Vec<SiteReport>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchReport {
    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// Sites that could not be searched (failed or timed out).
    pub fn failed_sites(&self) -> impl Iterator<Item = &SiteReport> {
        self.sites.iter().filter(|s| s.status.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scraped_job_serializes_optional_fields_as_null() {
        let job = ScrapedJob::new(
            "Backend Developer".into(),
            "https://www.indeed.com/viewjob?jk=1".into(),
            "Indeed".into(),
        );
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["title"], "Backend Developer");
        assert_eq!(json["source"], "Indeed");
        assert!(json["company"].is_null());
        assert!(json["posted_date"].is_null());
    }

    #[test]
    fn site_status_strings() {
        assert_eq!(SiteStatus::TimedOut.to_string(), "timed_out");
        assert_eq!(
            serde_json::to_value(SiteStatus::Empty).unwrap(),
            serde_json::json!("empty")
        );
        assert!(SiteStatus::Failed.is_failure());
        assert!(!SiteStatus::Empty.is_failure());
        assert!(!SiteStatus::Cancelled.is_failure());
    }

    #[test]
    fn failed_sites_filters_failures() {
        let now = Utc::now();
        let report = SearchReport {
            search_id: Uuid::new_v4(),
            term: "rust".into(),
            jobs: vec![],
            sites: vec![
                SiteReport {
                    site: "a".into(),
                    status: SiteStatus::Empty,
                    jobs: 0,
                    error: None,
                    elapsed_ms: 3,
                },
                SiteReport {
                    site: "b".into(),
                    status: SiteStatus::TimedOut,
                    jobs: 0,
                    error: Some("Request timed out after 1 seconds".into()),
                    elapsed_ms: 1000,
                },
            ],
            cancelled: false,
            started_at: now,
            finished_at: now,
        };
        let failed: Vec<_> = report.failed_sites().map(|s| s.site.as_str()).collect();
        assert_eq!(failed, vec!["b"]);
        assert_eq!(report.total(), 0);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobscout_core::{DirectoryEntry, ScrapedJob, SearchReport, SiteConfig, SiteReport};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    /// Search term, e.g. "desenvolvedor"
    pub query: String,
    /// Restrict the search to these site names (default: all configured sites)
    #[serde(default)]
    pub sites: Vec<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobResponse {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: String,
    pub source: String,
    pub description: Option<String>,
    pub salary: Option<String>,
    pub posted_date: Option<String>,
}

impl From<ScrapedJob> for JobResponse {
    fn from(job: ScrapedJob) -> Self {
        Self {
            title: job.title,
            company: job.company,
            location: job.location,
            url: job.url,
            source: job.source,
            description: job.description,
            salary: job.salary,
            posted_date: job.posted_date,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SiteReportResponse {
    pub site: String,
    /// One of `completed`, `empty`, `failed`, `timed_out`, `cancelled`
    pub status: String,
    pub jobs: usize,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl From<SiteReport> for SiteReportResponse {
    fn from(report: SiteReport) -> Self {
        Self {
            site: report.site,
            status: report.status.to_string(),
            jobs: report.jobs,
            error: report.error,
            elapsed_ms: report.elapsed_ms,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub search_id: Uuid,
    pub query: String,
    pub total: usize,
    pub jobs: Vec<JobResponse>,
    pub sites: Vec<SiteReportResponse>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl From<SearchReport> for SearchResponse {
    fn from(report: SearchReport) -> Self {
        Self {
            search_id: report.search_id,
            query: report.term,
            total: report.jobs.len(),
            jobs: report.jobs.into_iter().map(Into::into).collect(),
            sites: report.sites.into_iter().map(Into::into).collect(),
            started_at: report.started_at,
            finished_at: report.finished_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SiteResponse {
    pub name: String,
    pub label: String,
    pub origin: String,
    /// `domestic` or `international`
    pub region: String,
}

impl From<&SiteConfig> for SiteResponse {
    fn from(site: &SiteConfig) -> Self {
        Self {
            name: site.name.clone(),
            label: site.label.clone(),
            origin: site.origin.clone(),
            region: site.region.to_string(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DirectoryEntryResponse {
    pub name: String,
    pub url: String,
    pub region: String,
}

impl From<&DirectoryEntry> for DirectoryEntryResponse {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            url: entry.url.to_string(),
            region: entry.region.to_string(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SiteListResponse {
    /// Sites searched automatically
    pub sites: Vec<SiteResponse>,
    /// Sites listed for manual browsing only
    pub directory: Vec<DirectoryEntryResponse>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Number of configured sites
    pub sites: usize,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

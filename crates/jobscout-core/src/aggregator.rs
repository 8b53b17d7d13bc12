//! Concurrent search across every configured site adapter.
//!
//! All adapters are driven on the calling task through a
//! [`FuturesUnordered`]: their network waits overlap, but settlements are
//! handled one at a time, in the order they complete. No adapter failure
//! ever reaches the caller; it is logged, counted, and contributes zero jobs.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::AggregatorConfig;
use crate::error::AppError;
use crate::models::{ScrapedJob, SearchReport, SiteReport, SiteStatus};
use crate::registry::SiteRegistry;
use crate::site::SiteConfig;
use crate::traits::{Fetcher, ListingParser};

/// Events emitted during a search, in the order they happen.
#[derive(Debug, Clone)]
pub enum SearchEvent<'a> {
    Started {
        search_id: Uuid,
        term: &'a str,
        sites: usize,
    },
    SiteSettled {
        report: &'a SiteReport,
    },
    /// Emitted once per settled adapter, right after `SiteSettled`.
    Progress {
        completed: usize,
        total: usize,
        percent: f64,
    },
    Cancelled {
        pending: usize,
    },
    Finished {
        search_id: Uuid,
        total_jobs: usize,
        elapsed: Duration,
    },
}

/// Receives search events. The default implementation ignores them.
pub trait SearchReporter {
    fn report(&mut self, event: SearchEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl SearchReporter for NoopReporter {}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSearchReporter;

impl SearchReporter for TracingSearchReporter {
    fn report(&mut self, event: SearchEvent<'_>) {
        match event {
            SearchEvent::Started {
                search_id,
                term,
                sites,
            } => {
                tracing::info!(%search_id, %term, %sites, "Searching");
            }
            SearchEvent::SiteSettled { report } => {
                tracing::debug!(
                    site = %report.site,
                    status = %report.status,
                    jobs = report.jobs,
                    elapsed_ms = report.elapsed_ms,
                    "Site settled"
                );
            }
            SearchEvent::Progress {
                completed,
                total,
                percent,
            } => {
                tracing::info!("Searching... {:.0}% ({completed}/{total} sites)", percent);
            }
            SearchEvent::Cancelled { pending } => {
                tracing::warn!(%pending, "Search cancelled");
            }
            SearchEvent::Finished {
                search_id,
                total_jobs,
                elapsed,
            } => {
                tracing::info!(
                    %search_id,
                    %total_jobs,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Search finished"
                );
            }
        }
    }
}

/// Adapts a progress callback (`percent` in `[0, 100]`) into a reporter.
pub struct ProgressFn<F>(pub F);

impl<F: FnMut(f64)> SearchReporter for ProgressFn<F> {
    fn report(&mut self, event: SearchEvent<'_>) {
        if let SearchEvent::Progress { percent, .. } = event {
            (self.0)(percent);
        }
    }
}

/// Outcome of one adapter, before it is folded into the report.
struct Settlement<'a> {
    site: &'a SiteConfig,
    result: Result<Vec<ScrapedJob>, AppError>,
    elapsed: Duration,
}

/// Runs a search term against every site in a [`SiteRegistry`].
///
/// Generic over fetching and parsing so tests can run without the network.
#[derive(Clone)]
pub struct Aggregator<F, P>
where
    F: Fetcher,
    P: ListingParser,
{
    fetcher: F,
    parser: P,
    registry: SiteRegistry,
    config: AggregatorConfig,
}

impl<F, P> Aggregator<F, P>
where
    F: Fetcher,
    P: ListingParser,
{
    pub fn new(fetcher: F, parser: P, registry: SiteRegistry, config: AggregatorConfig) -> Self {
        Self {
            fetcher,
            parser,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    /// Same fetcher, parser and config over a different set of sites.
    pub fn with_registry(&self, registry: SiteRegistry) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            parser: self.parser.clone(),
            registry,
            config: self.config.clone(),
        }
    }

    /// Search one site: build its URL, fetch the first results page, parse it.
    pub async fn scrape_site(
        &self,
        site: &SiteConfig,
        term: &str,
    ) -> Result<Vec<ScrapedJob>, AppError> {
        let url = site.search_url_for(term);
        tracing::info!(site = %site.name, %url, "Fetching search page");

        let html = self.fetcher.fetch(&url).await?;
        tracing::debug!(site = %site.name, bytes = html.len(), "Fetched search page");

        let jobs = self.parser.parse(site, &html)?;
        if jobs.is_empty() && !html.trim().is_empty() {
            tracing::warn!(
                site = %site.name,
                selector = %site.selectors.listing,
                bytes = html.len(),
                "Page fetched but no listings matched; selectors may have drifted"
            );
        }

        Ok(jobs)
    }

    async fn run_site<'a>(&'a self, site: &'a SiteConfig, term: &'a str) -> Settlement<'a> {
        let start = Instant::now();
        let result = match self.config.site_timeout {
            Some(limit) => tokio::time::timeout(limit, self.scrape_site(site, term))
                .await
                .unwrap_or_else(|_| Err(AppError::Timeout(limit.as_secs_f64().ceil() as u64))),
            None => self.scrape_site(site, term).await,
        };
        Settlement {
            site,
            result,
            elapsed: start.elapsed(),
        }
    }

    /// Search every site concurrently and wait for all of them to settle.
    ///
    /// Progress is reported once per settled site with
    /// `percent = completed / total * 100`. When `cancel` fires, adapters
    /// still in flight are dropped (aborting their requests) and appear in the
    /// report as [`SiteStatus::Cancelled`].
    pub async fn search<R: SearchReporter>(
        &self,
        term: &str,
        cancel: &CancellationToken,
        reporter: &mut R,
    ) -> SearchReport {
        let search_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        let total = self.registry.len();

        reporter.report(SearchEvent::Started {
            search_id,
            term,
            sites: total,
        });

        let mut pending: FuturesUnordered<_> = self
            .registry
            .iter()
            .map(|site| self.run_site(site, term))
            .collect();

        let mut jobs = Vec::new();
        let mut sites = Vec::with_capacity(total);
        let mut settled: HashSet<&str> = HashSet::with_capacity(total);
        let mut cancelled = false;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = pending.next() => next,
            };
            let Some(Settlement {
                site,
                result,
                elapsed,
            }) = next
            else {
                break;
            };

            let elapsed_ms = elapsed.as_millis() as u64;
            let report = match result {
                Ok(site_jobs) => {
                    let count = site_jobs.len();
                    tracing::info!(%search_id, site = %site.name, jobs = count, elapsed_ms, "Site searched");
                    jobs.extend(site_jobs);
                    SiteReport {
                        site: site.name.clone(),
                        status: if count == 0 {
                            SiteStatus::Empty
                        } else {
                            SiteStatus::Completed
                        },
                        jobs: count,
                        error: None,
                        elapsed_ms,
                    }
                }
                Err(e) => {
                    tracing::warn!(%search_id, site = %site.name, error = %e, transport = e.is_transport(), elapsed_ms, "Site search failed");
                    SiteReport {
                        site: site.name.clone(),
                        status: match e {
                            AppError::Timeout(_) => SiteStatus::TimedOut,
                            _ => SiteStatus::Failed,
                        },
                        jobs: 0,
                        error: Some(e.to_string()),
                        elapsed_ms,
                    }
                }
            };

            settled.insert(site.name.as_str());
            reporter.report(SearchEvent::SiteSettled { report: &report });
            sites.push(report);

            let completed = settled.len();
            reporter.report(SearchEvent::Progress {
                completed,
                total,
                percent: completed as f64 / total as f64 * 100.0,
            });
        }
        drop(pending);

        if cancelled {
            let elapsed_ms = clock.elapsed().as_millis() as u64;
            let unsettled: Vec<_> = self
                .registry
                .iter()
                .filter(|s| !settled.contains(s.name.as_str()))
                .collect();
            reporter.report(SearchEvent::Cancelled {
                pending: unsettled.len(),
            });
            sites.extend(unsettled.into_iter().map(|site| SiteReport {
                site: site.name.clone(),
                status: SiteStatus::Cancelled,
                jobs: 0,
                error: Some(AppError::Cancelled.to_string()),
                elapsed_ms,
            }));
        }

        reporter.report(SearchEvent::Finished {
            search_id,
            total_jobs: jobs.len(),
            elapsed: clock.elapsed(),
        });

        SearchReport {
            search_id,
            term: term.to_string(),
            jobs,
            sites,
            cancelled,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Search every site and return the combined jobs.
    ///
    /// Never fails: a search where every site errors looks like a search with
    /// no matches. `on_progress` is called once per site, ending at `100`.
    pub async fn search_all_sites(
        &self,
        term: &str,
        on_progress: impl FnMut(f64),
    ) -> Vec<ScrapedJob> {
        let cancel = CancellationToken::new();
        let mut reporter = ProgressFn(on_progress);
        self.search(term, &cancel, &mut reporter).await.jobs
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use jobscout_client::{ReqwestFetcher, SelectorParser};
use jobscout_core::{
    Aggregator, AggregatorConfig, ScrapedJob, SiteRegion, SiteRegistry, TracingSearchReporter,
    directory_for,
};

#[derive(Parser)]
#[command(name = "jobscout", version, about = "Search several job boards at once")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every configured job site for a term
    Search {
        /// Search term, e.g. "desenvolvedor"
        #[arg(short, long)]
        query: String,

        /// Only search these sites (repeatable); defaults to all
        #[arg(short, long = "site")]
        sites: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// JSON file replacing the built-in site registry
        #[arg(long, env = "JOBSCOUT_SITES_FILE")]
        sites_file: Option<PathBuf>,

        /// Per-site time limit in seconds (0 disables it)
        #[arg(long, env = "JOBSCOUT_SITE_TIMEOUT_SECS")]
        site_timeout_secs: Option<u64>,

        /// User-Agent sent with every request
        #[arg(long, env = "JOBSCOUT_USER_AGENT")]
        user_agent: Option<String>,
    },

    /// List configured sites and the manual-search directory
    Sites {
        /// JSON file replacing the built-in site registry
        #[arg(long, env = "JOBSCOUT_SITES_FILE")]
        sites_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobscout=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            sites,
            format,
            sites_file,
            site_timeout_secs,
            user_agent,
        } => {
            let mut config = AggregatorConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
            if let Some(secs) = site_timeout_secs {
                config = config.with_site_timeout((secs > 0).then(|| Duration::from_secs(secs)));
            }
            if let Some(ua) = user_agent {
                config = config.with_user_agent(ua);
            }
            let registry = load_registry(sites_file.as_deref())?;
            cmd_search(&query, &sites, format, registry, config).await?;
        }
        Commands::Sites { sites_file } => {
            let registry = load_registry(sites_file.as_deref())?;
            cmd_sites(&registry, &mut std::io::stdout().lock())?;
        }
    }

    Ok(())
}

fn load_registry(path: Option<&Path>) -> Result<SiteRegistry> {
    SiteRegistry::from_optional_file(path).map_err(|e| anyhow::anyhow!(e))
}

async fn cmd_search(
    query: &str,
    sites: &[String],
    format: OutputFormat,
    registry: SiteRegistry,
    config: AggregatorConfig,
) -> Result<()> {
    let term = query.trim();
    if term.is_empty() {
        anyhow::bail!("search term must not be empty");
    }

    let registry = registry.select(sites).map_err(|e| anyhow::anyhow!(e))?;
    let fetcher = ReqwestFetcher::from_config(&config).context("Failed to create HTTP client")?;
    let aggregator = Aggregator::new(fetcher, SelectorParser, registry, config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling search");
            on_interrupt.cancel();
        }
    });

    let report = aggregator
        .search(term, &cancel, &mut TracingSearchReporter)
        .await;

    for site in report.failed_sites() {
        tracing::warn!(
            site = %site.site,
            status = %site.status,
            error = site.error.as_deref().unwrap_or_default(),
            "Site skipped"
        );
    }

    let mut out = std::io::stdout().lock();
    if report.jobs.is_empty() {
        writeln!(out, "No results found")?;
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report.jobs)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&report.jobs, &mut out)?,
        OutputFormat::Table => write_table(&report.jobs, &mut out)?,
    }

    Ok(())
}

fn write_csv(jobs: &[ScrapedJob], out: impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for job in jobs {
        writer.serialize(job).context("Failed to write CSV row")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_table(jobs: &[ScrapedJob], out: &mut impl Write) -> Result<()> {
    for job in jobs {
        let title = if job.title.is_empty() {
            "(untitled)"
        } else {
            &job.title
        };
        writeln!(out, "{title}")?;

        let meta: Vec<&str> = [job.company.as_deref(), job.location.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !meta.is_empty() {
            writeln!(out, "  {}", meta.join(" · "))?;
        }
        writeln!(out, "  [{}] {}", job.source, job.url)?;
        writeln!(out)?;
    }
    writeln!(out, "Found {} jobs", jobs.len())?;
    Ok(())
}

fn cmd_sites(registry: &SiteRegistry, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Searched automatically:")?;
    for site in registry.iter() {
        writeln!(
            out,
            "  {:<16} {:<14} {} ({})",
            site.name, site.label, site.origin, site.region
        )?;
    }

    for (region, heading) in [
        (SiteRegion::Domestic, "Portuguese job sites"),
        (SiteRegion::International, "International job sites"),
    ] {
        writeln!(out, "\n{heading}:")?;
        for entry in directory_for(region) {
            writeln!(out, "  {:<20} {}", entry.name, entry.url)?;
        }
    }

    Ok(())
}

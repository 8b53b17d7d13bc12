use jobscout_core::error::AppError;
use jobscout_core::models::ScrapedJob;
use jobscout_core::site::SiteConfig;
use jobscout_core::traits::ListingParser;
use scraper::{ElementRef, Html, Selector};

/// Listing parser driven by a site's CSS selectors.
///
/// Produces exactly one [`ScrapedJob`] per element matched by the `listing`
/// selector. Field selectors that miss leave the field empty (`title`, `url`)
/// or `None` (everything optional); nothing is filtered out.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorParser;

struct CompiledSelectors {
    listing: Selector,
    title: Selector,
    company: Option<Selector>,
    location: Option<Selector>,
    link: Selector,
    description: Option<Selector>,
    salary: Option<Selector>,
    posted_date: Option<Selector>,
}

impl CompiledSelectors {
    fn compile(site: &SiteConfig) -> Result<Self, AppError> {
        let s = &site.selectors;
        let optional = |sel: &Option<String>| sel.as_deref().map(|x| compile(site, x)).transpose();

        Ok(Self {
            listing: compile(site, &s.listing)?,
            title: compile(site, &s.title)?,
            company: optional(&s.company)?,
            location: optional(&s.location)?,
            link: compile(site, &s.link)?,
            description: optional(&s.description)?,
            salary: optional(&s.salary)?,
            posted_date: optional(&s.posted_date)?,
        })
    }
}

fn compile(site: &SiteConfig, selector: &str) -> Result<Selector, AppError> {
    Selector::parse(selector).map_err(|e| AppError::SelectorError {
        site: site.name.clone(),
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Text of the first match, with runs of whitespace collapsed.
fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|el| {
        el.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn optional_text(element: &ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    selector
        .and_then(|sel| first_text(element, sel))
        .filter(|text| !text.is_empty())
}

/// `href` of the listing itself when it matches the link selector,
/// otherwise of its first matching descendant.
fn link_href<'a>(element: &ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    let anchor = if selector.matches(element) {
        Some(*element)
    } else {
        element.select(selector).next()
    };
    anchor.and_then(|a| a.value().attr("href"))
}

impl ListingParser for SelectorParser {
    fn parse(&self, site: &SiteConfig, html: &str) -> Result<Vec<ScrapedJob>, AppError> {
        let selectors = CompiledSelectors::compile(site)?;
        let document = Html::parse_document(html);

        let jobs: Vec<ScrapedJob> = document
            .select(&selectors.listing)
            .map(|listing| ScrapedJob {
                title: first_text(&listing, &selectors.title).unwrap_or_default(),
                company: optional_text(&listing, selectors.company.as_ref()),
                location: optional_text(&listing, selectors.location.as_ref()),
                url: link_href(&listing, &selectors.link)
                    .map(|href| site.resolve_link(href))
                    .unwrap_or_default(),
                source: site.label.clone(),
                description: optional_text(&listing, selectors.description.as_ref()),
                salary: optional_text(&listing, selectors.salary.as_ref()),
                posted_date: optional_text(&listing, selectors.posted_date.as_ref()),
            })
            .collect();

        tracing::debug!(site = %site.name, listings = jobs.len(), "Parsed listings");
        Ok(jobs)
    }
}

use serde::Serialize;

use crate::site::SiteRegion;

/// A job site listed for manual browsing. These are links only; none of
/// them is scraped unless it also has a [`SiteConfig`](crate::site::SiteConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: &'static str,
    pub url: &'static str,
    pub region: SiteRegion,
}

const fn entry(name: &'static str, url: &'static str, region: SiteRegion) -> DirectoryEntry {
    DirectoryEntry { name, url, region }
}

const DIRECTORY: &[DirectoryEntry] = &[
    entry("Net Empregos", "https://www.net-empregos.com/", SiteRegion::Domestic),
    entry("SAPO Emprego", "https://emprego.sapo.pt/", SiteRegion::Domestic),
    entry("Emprego XL", "https://www.empregoxl.com/", SiteRegion::Domestic),
    entry("Turijobs", "https://www.turijobs.pt/", SiteRegion::Domestic),
    entry("IEFP", "https://www.iefp.pt/emprego", SiteRegion::Domestic),
    entry("CustoJusto", "https://www.custojusto.pt/emprego", SiteRegion::Domestic),
    entry("LinkedIn", "https://www.linkedin.com/jobs/", SiteRegion::International),
    entry("Indeed", "https://www.indeed.com/", SiteRegion::International),
    entry("Glassdoor", "https://www.glassdoor.com/Job/index.htm", SiteRegion::International),
    entry("Jooble", "https://jooble.org/", SiteRegion::International),
    entry("Monster", "https://www.monster.com/", SiteRegion::International),
];

/// Every known job site, domestic first.
pub fn directory() -> &'static [DirectoryEntry] {
    DIRECTORY
}

/// Known job sites in one region.
pub fn directory_for(region: SiteRegion) -> impl Iterator<Item = &'static DirectoryEntry> {
    DIRECTORY.iter().filter(move |e| e.region == region)
}

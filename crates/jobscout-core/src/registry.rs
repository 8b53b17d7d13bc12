use std::collections::HashSet;
use std::path::Path;

use crate::error::AppError;
use crate::site::{SiteConfig, builtin_sites};

/// Ordered set of site adapters to search.
///
/// Order only matters for listing and selection; the aggregator reports
/// results in settlement order regardless.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<SiteConfig>,
}

impl SiteRegistry {
    /// The built-in four-site registry.
    pub fn builtin() -> Self {
        Self {
            sites: builtin_sites(),
        }
    }

    /// Build a registry from explicit configs, validating each one.
    pub fn with_sites(sites: Vec<SiteConfig>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for site in &sites {
            site.validate()?;
            if !seen.insert(site.name.as_str()) {
                return Err(AppError::ConfigError(format!(
                    "Duplicate site name: {}",
                    site.name
                )));
            }
        }
        Ok(Self { sites })
    }

    /// Load a registry from a JSON file holding an array of site configs.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!(
                "Failed to read sites file {}: {e}",
                path.display()
            ))
        })?;

        let sites: Vec<SiteConfig> = serde_json::from_str(&raw).map_err(|e| {
            AppError::ConfigError(format!(
                "Invalid JSON in sites file {}: {e}",
                path.display()
            ))
        })?;

        let registry = Self::with_sites(sites)?;
        tracing::debug!(
            path = %path.display(),
            sites = registry.len(),
            "Loaded site registry"
        );
        Ok(registry)
    }

    /// Load from `path` when given, otherwise fall back to the built-in sites.
    pub fn from_optional_file(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| s.name == name)
    }

    /// Narrow the registry to the named sites, keeping registry order.
    ///
    /// An empty `names` slice selects every site.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, AppError> {
        if names.is_empty() {
            return Ok(self.clone());
        }

        if let Some(unknown) = names.iter().find(|n| self.get(n.as_ref()).is_none()) {
            return Err(AppError::SiteNotFound(unknown.as_ref().to_string()));
        }

        let sites = self
            .sites
            .iter()
            .filter(|s| names.iter().any(|n| n.as_ref() == s.name))
            .cloned()
            .collect();
        Ok(Self { sites })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

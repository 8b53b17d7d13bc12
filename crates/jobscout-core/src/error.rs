use thiserror::Error;

/// Application-wide error types for jobscout.
#[derive(Error, Debug)]
pub enum AppError {
    /// The site answered, but not with a usable page (non-2xx, unreadable body).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Connection or DNS failure.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request or site adapter timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A configured CSS selector could not be compiled.
    #[error("Invalid selector '{selector}' for site {site}: {message}")]
    SelectorError {
        site: String,
        selector: String,
        message: String,
    },

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A site name that is not present in the registry.
    #[error("Unknown site: {0}")]
    SiteNotFound(String),

    /// The search was cancelled before the adapter settled.
    #[error("Search cancelled")]
    Cancelled,

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true for failures on the way to the site (connect, DNS, non-2xx, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }
}

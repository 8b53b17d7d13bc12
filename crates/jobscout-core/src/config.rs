use std::time::Duration;

use crate::error::AppError;

/// Browser-like identification sent with every search request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Runtime knobs for a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Upper bound for one site adapter (fetch + parse). `None` waits forever.
    pub site_timeout: Option<Duration>,
    /// Timeout applied by the HTTP client to a single request.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            site_timeout: Some(Duration::from_secs(30)),
            request_timeout: Duration::from_secs(20),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Read configuration from environment variables.
    ///
    /// - `JOBSCOUT_SITE_TIMEOUT_SECS` (optional, defaults to 30, `0` disables)
    /// - `JOBSCOUT_REQUEST_TIMEOUT_SECS` (optional, defaults to 20, must be at least 1)
    /// - `JOBSCOUT_USER_AGENT` (optional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let site_timeout = match lookup("JOBSCOUT_SITE_TIMEOUT_SECS") {
            None => defaults.site_timeout,
            Some(raw) => match parse_secs("JOBSCOUT_SITE_TIMEOUT_SECS", &raw)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        };

        let request_timeout = match lookup("JOBSCOUT_REQUEST_TIMEOUT_SECS") {
            None => defaults.request_timeout,
            Some(raw) => {
                let secs = parse_secs("JOBSCOUT_REQUEST_TIMEOUT_SECS", &raw)?;
                if secs == 0 {
                    return Err(AppError::ConfigError(
                        "JOBSCOUT_REQUEST_TIMEOUT_SECS must be at least 1".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
        };

        let user_agent = lookup("JOBSCOUT_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        Ok(Self {
            site_timeout,
            request_timeout,
            user_agent,
        })
    }

    pub fn with_site_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.site_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!(
            "Invalid {key} '{raw}': must be a non-negative integer"
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AggregatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AggregatorConfig::default());
        assert_eq!(config.site_timeout, Some(Duration::from_secs(30)));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn zero_site_timeout_disables_it() {
        let config =
            AggregatorConfig::from_lookup(lookup(&[("JOBSCOUT_SITE_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(config.site_timeout, None);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AggregatorConfig::from_lookup(lookup(&[
            ("JOBSCOUT_SITE_TIMEOUT_SECS", "5"),
            ("JOBSCOUT_REQUEST_TIMEOUT_SECS", " 3 "),
            ("JOBSCOUT_USER_AGENT", "jobscout-test/1.0"),
        ]))
        .unwrap();
        assert_eq!(config.site_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "jobscout-test/1.0");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = AggregatorConfig::from_lookup(lookup(&[("JOBSCOUT_SITE_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("JOBSCOUT_SITE_TIMEOUT_SECS"));

        let err =
            AggregatorConfig::from_lookup(lookup(&[("JOBSCOUT_REQUEST_TIMEOUT_SECS", "0")]))
                .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn blank_user_agent_falls_back_to_default() {
        let config =
            AggregatorConfig::from_lookup(lookup(&[("JOBSCOUT_USER_AGENT", "  ")])).unwrap();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}

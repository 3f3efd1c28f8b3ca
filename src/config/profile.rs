use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable disguise and politeness settings for the fetch layer, loadable
/// from a TOML file so scraping jobs can ship their own profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperProfile {
    /// Minimum delay between polite requests, in seconds. Jitter is added
    /// on top.
    pub rate_limit_secs: f64,
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    /// Timeout for broken-link HEAD probes, which should fail fast.
    pub head_timeout_secs: u64,
    pub user_agents: Vec<String>,
    pub accept_languages: Vec<String>,
    pub referers: Vec<String>,
    /// Proxy URLs rotated round-robin. Empty means direct connections.
    pub proxies: Vec<String>,
    /// Uniform sleep range after a transport error, in seconds.
    pub error_backoff_secs: [f64; 2],
    /// Uniform sleep range after an HTTP 429, in seconds.
    pub rate_limit_backoff_secs: [f64; 2],
}

impl Default for ScraperProfile {
    fn default() -> Self {
        Self {
            rate_limit_secs: 2.0,
            max_retries: 3,
            request_timeout_secs: 30,
            head_timeout_secs: 10,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15".to_string(),
            ],
            accept_languages: vec![
                "en-US,en;q=0.9".to_string(),
                "en-GB,en;q=0.9".to_string(),
                "es-ES,es;q=0.8,en;q=0.7".to_string(),
                "fr-FR,fr;q=0.8,en;q=0.7".to_string(),
            ],
            referers: vec![
                "https://www.google.com/".to_string(),
                "https://www.bing.com/".to_string(),
                "https://duckduckgo.com/".to_string(),
            ],
            proxies: Vec::new(),
            error_backoff_secs: [5.0, 10.0],
            rate_limit_backoff_secs: [10.0, 20.0],
        }
    }
}

impl ScraperProfile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let profile: ScraperProfile = toml::from_str(&raw)?;
        profile.validate()?;
        Ok(profile)
    }
}

impl Validate for ScraperProfile {
    fn validate(&self) -> Result<()> {
        validate_range("rate_limit_secs", self.rate_limit_secs, 0.0, 300.0)?;
        validate_range("max_retries", self.max_retries, 1, 10)?;
        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 600)?;
        validate_range("head_timeout_secs", self.head_timeout_secs, 1, 600)?;
        validate_range(
            "error_backoff_secs",
            self.error_backoff_secs[0],
            0.0,
            self.error_backoff_secs[1],
        )?;
        validate_range(
            "rate_limit_backoff_secs",
            self.rate_limit_backoff_secs[0],
            0.0,
            self.rate_limit_backoff_secs[1],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(ScraperProfile::default().validate().is_ok());
    }

    #[test]
    fn test_profile_loads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "rate_limit_secs = 0.5\nmax_retries = 2\nproxies = [\"http://127.0.0.1:8080\"]"
        )
        .unwrap();

        let profile = ScraperProfile::from_file(file.path()).unwrap();
        assert_eq!(profile.max_retries, 2);
        assert_eq!(profile.proxies.len(), 1);
        // Unspecified fields keep their defaults
        assert_eq!(profile.request_timeout_secs, 30);
        assert!(!profile.user_agents.is_empty());
    }

    #[test]
    fn test_profile_rejects_zero_retries() {
        let profile = ScraperProfile {
            max_retries: 0,
            ..Default::default()
        };
        assert!(profile.validate().is_err());
    }
}

use crate::error::{Result, ScanError};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

/// Deepest crawl level accepted; larger requests are capped.
pub const MAX_DEPTH: usize = 10;

static BASE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^http(s)?://[a-zA-Z0-9\-_.]+/?$").expect("base URL pattern is valid")
});

/// Validated crawl settings. Built once by [`CrawlConfig::validate`] and
/// read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    base_url: String,
    parsed: Url,
    max_depth: usize,
}

impl CrawlConfig {
    /// Checks and normalizes the raw base URL and depth.
    ///
    /// The URL is trimmed of surrounding spaces and one trailing slash, then
    /// must be a bare `http(s)://host` with no port, path or query. Depths
    /// above [`MAX_DEPTH`] are capped with a warning.
    pub fn validate(raw_url: &str, depth: usize) -> Result<Self> {
        if raw_url.is_empty() {
            return Err(ScanError::MissingUrl);
        }

        let trimmed = raw_url.trim_matches(' ');
        let base_url = trimmed.strip_suffix('/').unwrap_or(trimmed).to_string();

        if !BASE_URL_PATTERN.is_match(&base_url) {
            return Err(ScanError::MalformedUrl(base_url));
        }

        let parsed = Url::parse(&base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let max_depth = if depth > MAX_DEPTH {
            warn!(
                "Up to {} levels of crawling are allowed. Capping at {}.",
                MAX_DEPTH, MAX_DEPTH
            );
            MAX_DEPTH
        } else {
            depth
        };

        Ok(Self {
            base_url,
            parsed,
            max_depth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Structural form of the base URL, used to resolve root-relative links.
    pub fn parsed_base(&self) -> &Url {
        &self.parsed
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_is_missing() {
        let err = CrawlConfig::validate("", 0).unwrap_err();
        assert!(matches!(err, ScanError::MissingUrl));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_incorrect_scheme_is_malformed() {
        let err = CrawlConfig::validate("htttp://aaa.com", 3).unwrap_err();
        assert!(matches!(err, ScanError::MalformedUrl(_)));
    }

    #[test]
    fn test_missing_scheme_is_malformed() {
        let err = CrawlConfig::validate("aaa.com", 3).unwrap_err();
        assert!(matches!(err, ScanError::MalformedUrl(_)));
    }

    #[test]
    fn test_path_query_and_port_are_rejected() {
        for raw in [
            "https://aaa.com/docs",
            "https://aaa.com?page=1",
            "https://aaa.com:8080",
            "ftp://aaa.com",
        ] {
            let err = CrawlConfig::validate(raw, 3).unwrap_err();
            assert!(
                matches!(err, ScanError::MalformedUrl(_)),
                "expected {} to be malformed, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_depth_above_max_is_capped() {
        let config = CrawlConfig::validate("https://aaa.com", 15).unwrap();
        assert_eq!(config.base_url(), "https://aaa.com");
        assert_eq!(config.max_depth(), 10);
    }

    #[test]
    fn test_depth_zero_is_kept() {
        let config = CrawlConfig::validate("https://aaa.com", 0).unwrap();
        assert_eq!(config.max_depth(), 0);
    }

    #[test]
    fn test_whitespace_and_trailing_slash_trimmed() {
        let config = CrawlConfig::validate("  http://sub.aaa-b.com/ ", 2).unwrap();
        assert_eq!(config.base_url(), "http://sub.aaa-b.com");
        assert_eq!(config.parsed_base().host_str(), Some("sub.aaa-b.com"));
        assert_eq!(config.max_depth(), 2);
    }
}

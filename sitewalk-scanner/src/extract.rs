use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};
use url::{ParseError, Url};

/// Hard cap on anchor matches considered per page.
pub const MAX_LINKS_PER_PAGE: usize = 30;

/// Finds same-site anchors in raw page content.
///
/// Only `href` values that start with the base URL followed by `/`, or that
/// are root-relative (`/...`), are matched. Links to other hosts, including
/// the other scheme of the same host, never match.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    scanner: Regex,
    base: Url,
}

impl LinkExtractor {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let pattern = format!(
            r#"<a\s+(?:[a-zA-Z0-9_="\- ]+)?href="((?:{})?/[a-zA-Z_0-9\-/&?]+)"\s*([a-z=]*)?(\s*/?>)?"#,
            regex::escape(config.base_url())
        );
        let scanner = Regex::new(&pattern)
            .map_err(|e| ScanError::ParseError(format!("link pattern: {}", e)))?;

        Ok(Self {
            scanner,
            base: config.parsed_base().clone(),
        })
    }

    /// Returns absolute outbound URLs in first-occurrence order, without
    /// duplicates. Deduplication is per call only.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let mut links = Vec::new();
        let mut seen = HashSet::new();

        for captures in self.scanner.captures_iter(content).take(MAX_LINKS_PER_PAGE) {
            let Some(href) = captures.get(1).map(|m| m.as_str()) else {
                continue;
            };

            if href.contains("redirect") {
                debug!("Skipping redirect link {}", href);
                continue;
            }

            let link = match Url::parse(href) {
                Ok(_) => href.to_string(),
                Err(ParseError::RelativeUrlWithoutBase) => match self.base.join(href) {
                    Ok(resolved) => resolved.to_string(),
                    Err(e) => {
                        warn!("Cannot resolve link {}: {}", href, e);
                        continue;
                    }
                },
                Err(e) => {
                    warn!("Cannot parse link {}: {}", href, e);
                    continue;
                }
            };

            if seen.insert(link.clone()) {
                links.push(link);
            }
        }

        links
    }
}

// Report rendering for aggregated site maps

use serde::{Deserialize, Serialize};
use sitewalk_scanner::SiteMap;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One indentation step of the tree view.
pub const OFFSET: &str = "   ";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const PAGE_OPEN: &str = "================================\n";
const PAGE_CLOSE: &str = "--------------------------------\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Renders the site map as an indented tree rooted at `start_url`.
///
/// Each page lists its links in extraction order and recurses into them
/// until `max_depth`. A link back to the page itself is listed but never
/// expanded, and a page expanded once already shows its links with a
/// "displayed before" marker instead of expanding them again.
pub fn render_site_map(site_map: &SiteMap, max_depth: usize, start_url: &str) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("SITE MAP\n");
    report.push_str(RULE);
    report.push_str(&format!("Base URL:      {}\n", start_url));
    report.push_str(&format!("Max depth:     {}\n", max_depth));
    report.push_str(&format!("Pages crawled: {}\n\n", site_map.len()));

    let mut displayed = HashSet::new();
    render_page(&mut report, site_map, max_depth, &mut displayed, 0, start_url);

    report.push('\n');
    report.push_str(RULE);
    report.push_str("END OF SITE MAP\n");
    report.push_str(RULE);

    report
}

fn render_page<'a>(
    report: &mut String,
    site_map: &'a SiteMap,
    max_depth: usize,
    displayed: &mut HashSet<&'a str>,
    depth: usize,
    url: &'a str,
) {
    let url_offset = OFFSET.repeat(depth + 1);
    let link_offset = format!("{}{}", url_offset, OFFSET);
    let links = site_map.links(url).unwrap_or(&[]);

    report.push_str(PAGE_OPEN);
    report.push_str(&format!("{}* {} (depth {})\n", url_offset, url, depth));
    report.push_str(&format!("{} number of links = {}\n", link_offset, links.len()));
    report.push_str(PAGE_CLOSE);

    for (i, link) in links.iter().enumerate() {
        report.push_str(&format!("{}- {} - [{}]\n", link_offset, i, link));

        if link == url {
            continue;
        }
        if displayed.contains(url) {
            report.push_str(&format!("{} (links displayed before)\n", link_offset));
            continue;
        }
        if depth + 1 > max_depth {
            continue;
        }
        render_page(report, site_map, max_depth, displayed, depth + 1, link);
    }

    displayed.insert(url);
    report.push_str(PAGE_CLOSE);
}

/// Serializes the site map as a JSON object of URL to outbound links.
pub fn generate_json_report(site_map: &SiteMap) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(site_map)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

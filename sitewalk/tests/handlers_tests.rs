use sitewalk::commands::command_argument_builder;
use sitewalk::handlers::*;
use sitewalk_core::crawl::CrawlSummary;
use sitewalk_core::report::ReportFormat;
use sitewalk_core::shutdown::EXIT_CONFIG;
use sitewalk_scanner::{CrawlConfig, CrawlOutcome, PageRecord, SiteMap};
use std::path::PathBuf;
use std::time::Duration;

fn matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["sitewalk"];
    argv.extend_from_slice(args);
    command_argument_builder()
        .try_get_matches_from(argv)
        .expect("arguments should parse")
}

fn summary() -> CrawlSummary {
    let site_map: SiteMap = [
        PageRecord::new(
            "https://mmmmm.com".to_string(),
            vec!["https://mmmmm.com/faq".to_string()],
        ),
        PageRecord::new("https://mmmmm.com/faq".to_string(), vec![]),
    ]
    .into_iter()
    .collect();

    CrawlSummary {
        config: CrawlConfig::validate("https://mmmmm.com", 1).unwrap(),
        outcome: CrawlOutcome::Completed(site_map),
        elapsed: Duration::from_millis(12),
    }
}

#[test]
fn test_defaults() {
    let m = matches(&[]);
    let options = crawl_options_from_matches(&m);

    assert_eq!(options.url, sitewalk::DEFAULT_URL);
    assert_eq!(options.depth, 3);
    assert_eq!(options.timeout_secs, 10);
    assert!(options.show_progress_bars);

    let target = report_target_from_matches(&m);
    assert_eq!(
        target,
        ReportTarget {
            format: ReportFormat::Text,
            output: None,
        }
    );
}

#[test]
fn test_flags_are_read() {
    let m = matches(&[
        "--url",
        "https://mmmmm.com",
        "--depth",
        "15",
        "-t",
        "3",
        "--format",
        "json",
        "-o",
        "out.json",
        "--quiet",
    ]);

    let options = crawl_options_from_matches(&m);
    assert_eq!(options.url, "https://mmmmm.com");
    // clamping happens during validation, not parsing
    assert_eq!(options.depth, 15);
    assert_eq!(options.timeout_secs, 3);
    assert!(!options.show_progress_bars);

    let target = report_target_from_matches(&m);
    assert_eq!(target.format, ReportFormat::Json);
    assert_eq!(target.output, Some(PathBuf::from("out.json")));
}

#[test]
fn test_invalid_depth_is_rejected_by_parser() {
    let result = command_argument_builder().try_get_matches_from(["sitewalk", "--depth", "-1"]);
    assert!(result.is_err());
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let result = command_argument_builder().try_get_matches_from(["sitewalk", "-q", "-v"]);
    assert!(result.is_err());
}

#[test]
fn test_render_report_text() {
    let report = render_report(&summary(), ReportFormat::Text).unwrap();

    assert!(report.contains("* https://mmmmm.com (depth 0)"));
    assert!(report.contains("* https://mmmmm.com/faq (depth 1)"));
}

#[test]
fn test_render_report_json() {
    let report = render_report(&summary(), ReportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();

    assert_eq!(parsed["https://mmmmm.com"][0], "https://mmmmm.com/faq");
    assert!(report.ends_with('\n'));
}

#[tokio::test]
async fn test_handle_crawl_config_error_exit_code() {
    let m = matches(&["--url", "not a url", "--quiet"]);
    assert_eq!(handle_crawl(&m).await, EXIT_CONFIG);
}

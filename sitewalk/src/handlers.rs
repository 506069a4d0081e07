use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use sitewalk_core::crawl::{CrawlOptions, CrawlSummary, execute_crawl};
use sitewalk_core::report::{ReportFormat, generate_json_report, render_site_map, save_report};
use sitewalk_core::shutdown::{EXIT_CONFIG, exit_code, interrupt_signal};
use sitewalk_scanner::CrawlOutcome;
use std::path::PathBuf;

/// Where and how the report is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTarget {
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
}

pub fn crawl_options_from_matches(matches: &ArgMatches) -> CrawlOptions {
    let defaults = CrawlOptions::default();
    CrawlOptions {
        url: matches.get_one::<String>("url").cloned().unwrap_or_default(),
        depth: matches.get_one::<usize>("depth").copied().unwrap_or(defaults.depth),
        timeout_secs: matches
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        show_progress_bars: !matches.get_flag("quiet"),
    }
}

pub fn report_target_from_matches(matches: &ArgMatches) -> ReportTarget {
    let format = matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    ReportTarget {
        format,
        output: matches.get_one::<PathBuf>("output").cloned(),
    }
}

/// Renders the aggregated site map of a run, partial or complete.
pub fn render_report(summary: &CrawlSummary, format: ReportFormat) -> Result<String> {
    let site_map = summary.outcome.site_map();
    match format {
        ReportFormat::Text => Ok(render_site_map(
            site_map,
            summary.config.max_depth(),
            summary.config.base_url(),
        )),
        ReportFormat::Json => {
            let mut json =
                generate_json_report(site_map).context("Failed to serialize site map")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn emit_report(summary: &CrawlSummary, target: &ReportTarget) -> Result<()> {
    let report = render_report(summary, target.format)?;
    match target.output {
        Some(ref path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }
    Ok(())
}

/// Runs the crawl described by `matches` and returns the process exit code.
pub async fn handle_crawl(matches: &ArgMatches) -> i32 {
    let options = crawl_options_from_matches(matches);
    let target = report_target_from_matches(matches);
    let quiet = matches.get_flag("quiet");

    if !quiet {
        eprintln!(
            "\n{} {} (max depth {})\n",
            "--- Starting to crawl".bright_blue().bold(),
            options.url.bright_white(),
            options.depth
        );
    }

    let result = execute_crawl(options, interrupt_signal()).await;
    let code = exit_code(result.as_ref().map(|summary| &summary.outcome));

    let summary = match result {
        Ok(summary) => summary,
        Err(e) if e.is_config_error() => {
            eprintln!("{} {}", "ERROR:".red().bold(), e);
            return code;
        }
        Err(e) => {
            eprintln!("\n{} {}\n", "failure!:".red().bold(), e);
            return code;
        }
    };

    if let Err(e) = emit_report(&summary, &target) {
        eprintln!("{} {:#}", "ERROR:".red().bold(), e);
        return EXIT_CONFIG;
    }

    match summary.outcome {
        CrawlOutcome::Completed(_) => {
            if !quiet {
                eprintln!("\n>> The crawler took {:.2?} <<\n", summary.elapsed);
            }
        }
        CrawlOutcome::Interrupted { ref signal, .. } => {
            eprintln!(
                "\n{} {} after {:.2?}\n",
                "Interrupted by".yellow().bold(),
                signal,
                summary.elapsed
            );
        }
    }

    code
}

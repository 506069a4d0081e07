use indicatif::{ProgressBar, ProgressStyle};
use sitewalk_scanner::{
    CrawlConfig, CrawlOutcome, Crawler, FetchFn, HttpFetcher, ProgressCallback, ScanError,
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub depth: usize,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            url: String::new(),
            depth: 3,
            timeout_secs: 10,
            show_progress_bars: false,
        }
    }
}

/// A finished (or interrupted) run together with the settings it used.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub config: CrawlConfig,
    pub outcome: CrawlOutcome,
    pub elapsed: Duration,
}

/// Execute a crawl over HTTP, racing it against `interrupt`.
pub async fn execute_crawl<I>(options: CrawlOptions, interrupt: I) -> Result<CrawlSummary, ScanError>
where
    I: Future<Output = String>,
{
    let fetch = HttpFetcher::with_timeout(options.timeout_secs)?.into_fetch_fn();
    execute_crawl_with_fetcher(options, fetch, interrupt).await
}

/// Same as [`execute_crawl`] with a caller supplied fetcher.
pub async fn execute_crawl_with_fetcher<I>(
    options: CrawlOptions,
    fetch: FetchFn,
    interrupt: I,
) -> Result<CrawlSummary, ScanError>
where
    I: Future<Output = String>,
{
    let config = CrawlConfig::validate(&options.url, options.depth)?;
    let mut crawler = Crawler::new(config.clone(), fetch)?;

    // Set up single spinner for overall crawl progress (only if enabled)
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Crawling {}...", config.base_url()));
        let pb = Arc::new(pb);

        let pb_clone = pb.clone();
        let callback: ProgressCallback = Arc::new(move |count: usize, url: String| {
            pb_clone.set_message(format!("Crawling... {} pages recorded, last {}", count, url));
        });
        crawler = crawler.with_progress_callback(callback);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let result = crawler.crawl(interrupt).await;
    let elapsed = start.elapsed();

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(CrawlSummary {
        config,
        outcome: result?,
        elapsed,
    })
}

pub mod crawl;
pub mod report;
pub mod shutdown;

pub use crawl::{CrawlOptions, CrawlSummary, execute_crawl, execute_crawl_with_fetcher};
pub use report::{ReportFormat, generate_json_report, render_site_map, save_report};
pub use shutdown::{EXIT_CONFIG, EXIT_FAILURE, EXIT_OK, exit_code, interrupt_signal};

pub mod commands;
pub mod handlers;

pub use commands::{DEFAULT_URL, command_argument_builder};
pub use handlers::{
    ReportTarget, crawl_options_from_matches, handle_crawl, render_report, report_target_from_matches,
};

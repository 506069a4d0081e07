use clap::ArgMatches;
use sitewalk::{command_argument_builder, handle_crawl};
use tracing::Level;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    init_logging(&matches);

    let code = handle_crawl(&matches).await;
    // Exiting here also stops any fetches still running after an interrupt.
    std::process::exit(code);
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else if matches.get_flag("quiet") {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

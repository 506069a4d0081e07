use clap::arg;

pub const DEFAULT_URL: &str = "https://www.rust-lang.org";

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitewalk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitewalk")
        .about("Crawl a site from its base URL and print the tree of pages and their links")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("Base URL where the crawl starts (scheme and host only)")
                .default_value(DEFAULT_URL),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("How many link hops to follow from the base URL. Up to 10 levels are supported.")
                .value_parser(clap::value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(arg!(-q --"quiet" "Suppress banner, progress and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Log every fetch and dispatch decision")
                .required(false)
                .conflicts_with("quiet"),
        )
}

use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("crumbtrail")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("crumbtrail")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --verbose ... "Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a site from a seed URL, recording titles, metadata, breadcrumbs and \
                URL hierarchies for every same-domain page.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl (bare hosts get http://)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-m --"max-pages" <NUM_PAGES>)
                        .required(false)
                        .help("Stop dispatching after this many pages (0 = unbounded)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    arg!(-d --"delay" <SECONDS>)
                        .required(false)
                        .help("Minimum delay between dispatches, fractional seconds allowed")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("0.5"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Write exports into this directory (default: display to screen)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Export format: text, json, csv")
                        .value_parser(["text", "json", "csv"])
                        .default_value("csv"),
                )
                .arg(
                    arg!(--"tree" <KIND>)
                        .required(false)
                        .help("Print a hierarchy tree after the crawl: url or breadcrumb")
                        .value_parser(["url", "breadcrumb"]),
                )
                .arg(
                    arg!(--"max-tree-depth" <LEVELS>)
                        .required(false)
                        .help("Limit how many tree levels are printed")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            command!("hierarchy")
                .about("Inspect the hierarchies of a previously exported pages JSON file")
                .arg(
                    arg!(-p --"pages" <PATH>)
                        .required(true)
                        .help("Path to a pages JSON export")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-k --"kind" <KIND>)
                        .required(false)
                        .help("Which hierarchy to use: url or breadcrumb")
                        .value_parser(["url", "breadcrumb"])
                        .default_value("url"),
                )
                .arg(
                    arg!(--"max-depth" <LEVELS>)
                        .required(false)
                        .help("Limit how many tree levels are printed")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"compare")
                        .required(false)
                        .help("Show the URL vs breadcrumb depth comparison instead of a tree")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("flat"),
                )
                .arg(
                    arg!(--"flat")
                        .required(false)
                        .help("List every hierarchy level once instead of drawing a tree")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("compare"),
                ),
        )
}

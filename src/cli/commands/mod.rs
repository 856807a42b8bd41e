use crate::actions::decoding::DEFAULT_SOURCE;
use clap::{
    Arg, ArgAction, ArgGroup, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("datasets")
                .help("Dataset ids or source tags to load, prefix with ^ to exclude")
                .long("datasets")
                .long_help(
                    "Dataset ids or source tags to load.\n\
                    A tag selects every dataset carrying it. Prefix a value with ^ to exclude it.\n\
                    Without values every dataset of the catalog is loaded.\n\n\
                    Example: --datasets adb ^ds3"
                )
                .num_args(0..)
                .value_name("ID|TAG"),
        )
        .arg(
            Arg::new("datasets-file")
                .default_value("datasets.json")
                .env("CQLOAD_DATASETS_FILE")
                .help("Dataset catalog, a JSON object keyed by dataset id")
                .long("datasets-file")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("actions")
                .alias("do")
                .help("Actions to run, prefix with ^ to exclude")
                .long("actions")
                .long_help(
                    "Actions to run, always in catalog order:\n\
                    dataset, mapping, secondaryid, search, table, concept, cqpp, structure, \
                    preview, decoding, update\n\n\
                    Prefix a name with ^ to run every action but the excluded ones.\n\
                    Selecting and excluding at the same time is an error.\n\n\
                    Example: --actions ^cqpp ^decoding"
                )
                .num_args(0..)
                .value_name("NAME")
                .short('a'),
        )
        .arg(
            Arg::new("from")
                .help("Run this action and every action after it")
                .long("from")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("to")
                .help("Run every action up to and including this one")
                .long("to")
                .value_name("NAME"),
        )
        .group(
            ArgGroup::new("selection")
                .args(["actions", "from", "to"])
                .multiple(false),
        )
        .arg(
            Arg::new("cqpp")
                .env("CQLOAD_CQPP")
                .help("Root of the preprocessed chunks, {cqpp}/{id}/cqpp/*.cqpp")
                .long("cqpp")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("decode")
                .env("CQLOAD_DECODE")
                .help("Root of the decoding files, defaults to --cqpp")
                .long("decode")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("decode-source")
                .default_value(DEFAULT_SOURCE)
                .help("Only upload decoding files of datasets carrying this source tag")
                .long("decode-source")
                .value_name("TAG"),
        )
        .arg(
            Arg::new("decode-all")
                .action(ArgAction::SetTrue)
                .conflicts_with("decode-source")
                .help("Upload decoding files of every dataset, whatever its source tags")
                .long("decode-all"),
        )
        .arg(
            Arg::new("json")
                .default_value("./gen")
                .env("CQLOAD_JSON")
                .help("Root of the generated json artifacts")
                .long("json")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("parallelism")
                .env("CQLOAD_PARALLELISM")
                .help("Concurrent chunk uploads per dataset")
                .long("parallelism")
                .long_help(
                    "Concurrent chunk uploads per dataset.\n\
                    Without it chunks are uploaded one at a time across all datasets."
                )
                .short('p')
                .value_name("N")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("delay")
                .default_value("5")
                .env("CQLOAD_DELAY")
                .help("Seconds to wait between two actions")
                .long("delay")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("update")
                .action(ArgAction::SetTrue)
                .help("Replace existing artifacts (PUT) instead of creating them (POST)")
                .long("update")
                .short('u'),
        )
        .arg(
            Arg::new("dry-run")
                .action(ArgAction::SetTrue)
                .help("Log every call without sending it")
                .long("dry-run")
                .short('n'),
        )
        .arg(
            Arg::new("token")
                .env("API_TOKEN")
                .help("Bearer token for the admin API")
                .hide_env_values(true)
                .long("token")
                .short('t'),
        )
        .arg(
            Arg::new("port")
                .default_value("8081")
                .env("ADMIN_PORT")
                .help("Admin port on localhost, http://localhost:<port>/admin")
                .long("port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("server")
                .help("Admin server base url, <server>/admin")
                .long("server")
                .short('s')
                .value_name("URL"),
        )
        .arg(
            Arg::new("fast-fail")
                .action(ArgAction::SetTrue)
                .help("Exit on the first logged error")
                .long("fast-fail"),
        )
        .arg(
            Arg::new("fail-on-warning")
                .action(ArgAction::SetTrue)
                .help("Treat logged warnings as errors")
                .long("fail-on-warning"),
        )
        .arg(
            Arg::new("log")
                .help("Also log to this file, or to <dir>/<date>.log for a directory")
                .long("log")
                .value_name("PATH"),
        )
}

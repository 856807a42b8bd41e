use crate::{cli::actions::Action, error::LoadError, pipeline::Selection, telemetry};
use anyhow::{Context, Result, bail};
use clap::{ArgMatches, parser::ValueSource};
use std::{num::NonZeroUsize, path::PathBuf, time::Duration};

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// `--actions`, `--from` and `--to` are mutually exclusive, clap enforces it
fn selection(matches: &ArgMatches) -> Selection {
    if matches.contains_id("actions") {
        Selection::Names(strings(matches, "actions"))
    } else if let Some(from) = matches.get_one::<String>("from") {
        Selection::From(from.clone())
    } else if let Some(to) = matches.get_one::<String>("to") {
        Selection::To(to.clone())
    } else {
        Selection::All
    }
}

/// Base url of the admin API
///
/// `ADMIN_PORT` only provides the default port, so `--server` overrides it.
/// An explicit `--port` together with `--server` is an error.
fn api_url(matches: &ArgMatches) -> Result<String> {
    match matches.get_one::<String>("server") {
        Some(server) => {
            if matches.value_source("port") == Some(ValueSource::CommandLine) {
                bail!("--server can't be used with --port");
            }
            Ok(format!("{}/admin", server.trim_end_matches('/')))
        }
        None => {
            let port = matches.get_one::<u16>("port").copied().unwrap_or(8081);
            Ok(format!("http://localhost:{port}/admin"))
        }
    }
}

/// `--decode-all` lifts the source filter of the decoding upload
fn decode_source(matches: &ArgMatches) -> Option<String> {
    if matches.get_flag("decode-all") {
        None
    } else {
        matches.get_one::<String>("decode-source").cloned()
    }
}

/// Extract the logging flags, needed before dispatching
#[must_use]
pub fn telemetry_options(matches: &ArgMatches) -> telemetry::Options {
    telemetry::Options {
        log: matches.get_one::<String>("log").map(PathBuf::from),
        fast_fail: matches.get_flag("fast-fail"),
        fail_on_warning: matches.get_flag("fail-on-warning"),
    }
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if the parallelism is zero or required parameters are
/// missing
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    let datasets_file = matches
        .get_one::<String>("datasets-file")
        .map(PathBuf::from)
        .context("Dataset catalog file is required")?;

    let parallelism = matches
        .get_one::<usize>("parallelism")
        .map(|&n| NonZeroUsize::new(n).ok_or(LoadError::InvalidConcurrency(n)))
        .transpose()
        .context("Invalid --parallelism")?;

    let cqpp = matches.get_one::<String>("cqpp").map(PathBuf::from);

    // decoding files usually sit next to the chunks
    let decode = matches
        .get_one::<String>("decode")
        .map(PathBuf::from)
        .or_else(|| cqpp.clone());

    let json = matches
        .get_one::<String>("json")
        .map_or_else(|| PathBuf::from("./gen"), PathBuf::from);

    let delay = Duration::from_secs(matches.get_one::<u64>("delay").copied().unwrap_or(5));

    Ok(Action::Load {
        datasets: strings(matches, "datasets"),
        datasets_file,
        selection: selection(matches),
        cqpp,
        decode,
        decode_source: decode_source(matches),
        json,
        parallelism,
        delay,
        update: matches.get_flag("update"),
        dry_run: matches.get_flag("dry-run"),
        token: matches.get_one::<String>("token").cloned(),
        api_url: api_url(matches)?,
    })
}

//! Logging setup
//!
//! Events go to stderr and, with `--log`, to a file as well. `--fast-fail` and
//! `--fail-on-warning` add a layer that ends the process on the first event at
//! or above the configured level. That layer is registered last so the other
//! layers have already written the event out.

use anyhow::{Context as _, Result};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    process,
    sync::Mutex,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt,
    layer::{self, SubscriberExt},
    util::SubscriberInitExt,
};

/// Logging flags from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Log file, or directory receiving one `{YYYY-MM-DD}.log` per day
    pub log: Option<PathBuf>,
    pub fast_fail: bool,
    pub fail_on_warning: bool,
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default `info` filter.
///
/// # Errors
///
/// Returns an error if the log file can't be created or a global subscriber
/// is already installed
pub fn init(options: &Options) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match &options.log {
        Some(path) => {
            let path = log_path(path)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(FailLayer::new(options.fast_fail, options.fail_on_warning))
        .try_init()
        .context("Failed to install the logger")?;

    Ok(())
}

/// Resolve `--log`: a missing path is created as a directory, a directory gets
/// a file named after the current local date
///
/// # Errors
///
/// Returns an error if the directory can't be created
pub fn log_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create log directory {}", path.display()))?;
    }

    if path.is_dir() {
        let name = format!("{}.log", chrono::Local::now().format("%Y-%m-%d"));
        Ok(path.join(name))
    } else {
        Ok(path.to_path_buf())
    }
}

/// Terminates the process with exit code 1 on the first event at or above
/// `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailLayer {
    threshold: Level,
}

impl FailLayer {
    /// `None` unless one of the flags is set
    #[must_use]
    pub const fn new(fast_fail: bool, fail_on_warning: bool) -> Option<Self> {
        if fail_on_warning {
            Some(Self {
                threshold: Level::WARN,
            })
        } else if fast_fail {
            Some(Self {
                threshold: Level::ERROR,
            })
        } else {
            None
        }
    }

    /// Whether an event at `level` ends the process
    #[must_use]
    pub fn triggers(self, level: Level) -> bool {
        // ERROR is the lowest level
        level <= self.threshold
    }
}

impl<S: Subscriber> Layer<S> for FailLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        if self.triggers(*event.metadata().level()) {
            eprintln!("Exiting, {} logged", event.metadata().level());
            process::exit(1);
        }
    }
}

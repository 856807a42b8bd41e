use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a load run.
///
/// Per-call HTTP failures are not errors: they are collected as
/// [`crate::api::Failure`] records and only surface through [`LoadError::Failed`]
/// once every selected action has executed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Did not find an action with name {0}")]
    UnknownAction(String),

    #[error("Action {0} is registered more than once")]
    DuplicateAction(String),

    #[error(
        "Actions should only be either selected or excluded. Selected: {selected:?} Excluded: {excluded:?}"
    )]
    AmbiguousSelection {
        selected: Vec<String>,
        excluded: Vec<String>,
    },

    #[error("Need at least one upload per dataset, got parallelism {0}")]
    InvalidConcurrency(usize),

    #[error("No file matching {pattern} in {}", dir.display())]
    MissingArtifact { dir: PathBuf, pattern: String },

    #[error("Found {count} files matching {pattern} in {}, need exactly one", dir.display())]
    AmbiguousArtifact {
        dir: PathBuf,
        pattern: String,
        count: usize,
    },

    #[error("Action {action} needs {flag} to be set")]
    MissingDirectory {
        action: &'static str,
        flag: &'static str,
    },

    #[error("Invalid datasets {0:?}")]
    InvalidDatasets(Vec<String>),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Token is not a valid header value")]
    InvalidToken,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Upload permits closed: {0}")]
    PermitsClosed(#[from] tokio::sync::AcquireError),

    #[error("Failed with {0} errors")]
    Failed(usize),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;

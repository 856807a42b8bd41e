//! Discovery of the artifact files an action uploads

use crate::error::{LoadError, Result};
use std::path::{Path, PathBuf};

/// File name pattern `{prefix}*{suffix}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl Pattern {
    #[must_use]
    pub const fn suffix(suffix: &'static str) -> Self {
        Self { prefix: "", suffix }
    }

    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.len() >= self.prefix.len() + self.suffix.len()
            && file_name.starts_with(self.prefix)
            && file_name.ends_with(self.suffix)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.prefix, self.suffix)
    }
}

/// All files in `dir` matching `pattern`, sorted by path.
///
/// A missing directory yields no files.
///
/// # Errors
///
/// Returns an error if the directory exists but can't be read
pub fn discover(dir: &Path, pattern: Pattern) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LoadError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        let path = entry.path();
        if path.is_file()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name))
        {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// The single file in `dir` matching `pattern`
///
/// # Errors
///
/// Returns [`LoadError::MissingArtifact`] if there is none and
/// [`LoadError::AmbiguousArtifact`] if there are several
pub fn single(dir: &Path, pattern: Pattern) -> Result<PathBuf> {
    let mut files = discover(dir, pattern)?;

    if files.len() > 1 {
        return Err(LoadError::AmbiguousArtifact {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
            count: files.len(),
        });
    }

    files.pop().ok_or_else(|| LoadError::MissingArtifact {
        dir: dir.to_path_buf(),
        pattern: pattern.to_string(),
    })
}

/// File name without the artifact suffix, used in log messages
#[must_use]
pub fn stem<'a>(path: &'a Path, suffix: &str) -> &'a str {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    name.strip_suffix(suffix).unwrap_or(name)
}

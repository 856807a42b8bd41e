use crate::{
    error::{LoadError, Result},
    pipeline::EXCLUDE_MARKER,
};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::Path,
};

/// A dataset known to the admin API.
///
/// `id` names the on-disk directory of its artifacts, `name` is used in API
/// URLs. Equality includes the id, so two catalog entries that only differ by
/// id stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub label: String,
    pub weight: i32,
    /// Tags usable as a meta-selector instead of dataset ids
    pub sources: BTreeSet<String>,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset({})", self.name)
    }
}

#[derive(Debug, Deserialize)]
struct DatasetEntry {
    name: String,
    label: String,
    #[serde(default)]
    weight: i32,
    #[serde(default)]
    sources: BTreeSet<String>,
}

/// Parse a dataset catalog: a JSON object keyed by dataset id.
///
/// # Errors
///
/// Returns an error if the JSON is malformed
pub fn parse_catalog(raw: &str) -> serde_json::Result<Vec<Dataset>> {
    let entries: BTreeMap<String, DatasetEntry> = serde_json::from_str(raw)?;

    Ok(entries
        .into_iter()
        .map(|(id, entry)| Dataset {
            id,
            name: entry.name,
            label: entry.label,
            weight: entry.weight,
            sources: entry.sources,
        })
        .collect())
}

/// Read the dataset catalog file
///
/// # Errors
///
/// Returns an error if the file can't be read or is not a valid catalog
pub fn load_catalog(path: &Path) -> Result<Vec<Dataset>> {
    let raw = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_catalog(&raw).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn is_selected(dataset: &Dataset, selection: &BTreeSet<&str>) -> bool {
    selection.contains(dataset.id.as_str())
        || dataset
            .sources
            .iter()
            .any(|source| selection.contains(source.as_str()))
}

/// Resolve the working set of datasets from selection tokens.
///
/// A token matches a dataset by id or by one of its source tags. Tokens
/// prefixed with `^` exclude; an empty selection means every dataset. The
/// result keeps the order of `available`.
///
/// # Errors
///
/// Returns [`LoadError::InvalidDatasets`] if a token matches neither an id nor a
/// source tag
pub fn resolve(tokens: &[String], available: &[Dataset]) -> Result<Vec<Dataset>> {
    let (excluded, selected): (Vec<&str>, Vec<&str>) = tokens
        .iter()
        .map(String::as_str)
        .partition(|token| token.starts_with(EXCLUDE_MARKER));

    let selected: BTreeSet<&str> = selected.into_iter().collect();
    let excluded: BTreeSet<&str> = excluded
        .into_iter()
        .map(|token| token.strip_prefix(EXCLUDE_MARKER).unwrap_or(token))
        .collect();

    let known: BTreeSet<&str> = available
        .iter()
        .flat_map(|dataset| {
            std::iter::once(dataset.id.as_str()).chain(dataset.sources.iter().map(String::as_str))
        })
        .collect();

    let invalid: Vec<String> = selected
        .union(&excluded)
        .filter(|token| !known.contains(*token))
        .map(|token| (*token).to_string())
        .collect();

    if !invalid.is_empty() {
        return Err(LoadError::InvalidDatasets(invalid));
    }

    Ok(available
        .iter()
        .filter(|dataset| selected.is_empty() || is_selected(dataset, &selected))
        .filter(|dataset| !is_selected(dataset, &excluded))
        .cloned()
        .collect())
}

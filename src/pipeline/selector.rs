use super::{Action, Catalog};
use crate::error::{LoadError, Result};
use std::{collections::BTreeSet, sync::Arc};

/// Which actions of the catalog a run executes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// The entire catalog
    #[default]
    All,
    /// Either included names or marker-prefixed excluded names; an empty list
    /// selects everything
    Names(Vec<String>),
    /// The named action and everything after it
    From(String),
    /// Everything up to and including the named action
    To(String),
}

/// Resolve a selection to actions, always in catalog order.
///
/// # Errors
///
/// Returns [`LoadError::AmbiguousSelection`] if included and excluded names are
/// mixed and [`LoadError::UnknownAction`] if a name is not in the catalog
pub fn resolve(
    selection: &Selection,
    catalog: &Catalog,
    exclude_marker: &str,
) -> Result<Vec<Arc<dyn Action>>> {
    match selection {
        Selection::All => Ok(catalog.iter().cloned().collect()),
        Selection::Names(names) => subset(names, catalog, exclude_marker),
        Selection::From(name) => {
            let start = catalog.position(name)?;
            Ok(catalog.iter().skip(start).cloned().collect())
        }
        Selection::To(name) => {
            let end = catalog.position(name)?;
            Ok(catalog.iter().take(end + 1).cloned().collect())
        }
    }
}

fn subset(
    names: &[String],
    catalog: &Catalog,
    exclude_marker: &str,
) -> Result<Vec<Arc<dyn Action>>> {
    let mut included = BTreeSet::new();
    let mut excluded = BTreeSet::new();

    for name in names {
        match name.strip_prefix(exclude_marker) {
            Some(stripped) if !exclude_marker.is_empty() => excluded.insert(stripped),
            _ => included.insert(name.as_str()),
        };
    }

    if !included.is_empty() && !excluded.is_empty() {
        return Err(LoadError::AmbiguousSelection {
            selected: included.into_iter().map(String::from).collect(),
            excluded: excluded.into_iter().map(String::from).collect(),
        });
    }

    for name in included.iter().chain(excluded.iter()) {
        catalog.lookup(name)?;
    }

    Ok(catalog
        .iter()
        .filter(|action| {
            if included.is_empty() {
                !excluded.contains(action.name())
            } else {
                included.contains(action.name())
            }
        })
        .cloned()
        .collect())
}

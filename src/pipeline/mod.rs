//! Action pipeline
//!
//! An ordered [`Catalog`] of named actions, a [`selector`] resolving which of
//! them run, and an [`orchestrator`] executing the selection one action at a
//! time with a shared, read-only [`Context`].
//!
//! # Module Organization
//!
//! - `selector` - subset, exclusion and range selection over the catalog
//! - `orchestrator` - sequential execution and failure aggregation

pub mod orchestrator;
pub mod selector;

pub use orchestrator::{Summary, run};
pub use selector::{Selection, resolve};

use crate::{
    api::{AdminClient, Failure},
    dataset::Dataset,
    error::{LoadError, Result},
};
use async_trait::async_trait;
use reqwest::Method;
use std::{fmt, num::NonZeroUsize, path::PathBuf, sync::Arc};

/// Names starting with this marker are excluded from a selection
pub const EXCLUDE_MARKER: &str = "^";

/// A named unit of upload work
#[async_trait]
pub trait Action: Send + Sync {
    /// Unique name within a catalog
    fn name(&self) -> &str;

    /// Verify the context provides what the action needs. Called for every
    /// selected action before the first one executes.
    ///
    /// # Errors
    ///
    /// Returns an error if the action can't run with this context
    fn check(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    /// Run the action, returning every call that did not succeed.
    ///
    /// # Errors
    ///
    /// Returns an error for conditions that must abort the whole run, like a
    /// missing or ambiguous artifact
    async fn execute(&self, ctx: &Context) -> Result<Vec<Failure>>;
}

impl fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({})", self.name())
    }
}

/// Parameters shared by every action of a run
#[derive(Debug, Clone)]
pub struct Context {
    pub datasets: Vec<Dataset>,
    /// Root of the preprocessed binary chunks
    pub cqpp_dir: Option<PathBuf>,
    /// Root of the id decoding files
    pub decode_dir: Option<PathBuf>,
    /// Root of the generated json artifacts
    pub json_dir: PathBuf,
    /// Concurrent chunk uploads per dataset, `None` uploads one chunk at a time
    /// across the whole run
    pub parallelism: Option<NonZeroUsize>,
    /// Replace existing artifacts (PUT) instead of creating them (POST)
    pub update: bool,
    /// Only decode datasets carrying this source tag
    pub decode_source: Option<String>,
    pub client: AdminClient,
}

impl Context {
    /// `{base}/datasets`
    #[must_use]
    pub fn datasets_url(&self) -> String {
        self.client.datasets_url()
    }

    /// `{base}/datasets/{name}/{endpoint}`
    #[must_use]
    pub fn dataset_url(&self, dataset: &Dataset, endpoint: &str) -> String {
        format!("{}/{}/{endpoint}", self.datasets_url(), dataset.name)
    }

    /// Method used for artifact uploads
    #[must_use]
    pub fn upload_method(&self) -> Method {
        if self.update { Method::PUT } else { Method::POST }
    }
}

/// The fixed, ordered list of known actions
///
/// Order is execution order.
#[derive(Debug, Clone)]
pub struct Catalog {
    actions: Vec<Arc<dyn Action>>,
}

impl Catalog {
    /// Register actions in execution order
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateAction`] if a name is used twice
    pub fn new(actions: Vec<Arc<dyn Action>>) -> Result<Self> {
        for (index, action) in actions.iter().enumerate() {
            if actions
                .iter()
                .take(index)
                .any(|other| other.name() == action.name())
            {
                return Err(LoadError::DuplicateAction(action.name().to_string()));
            }
        }

        Ok(Self { actions })
    }

    /// Find an action by name
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnknownAction`] if no action has this name
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Action>> {
        self.actions
            .iter()
            .find(|action| action.name() == name)
            .ok_or_else(|| LoadError::UnknownAction(name.to_string()))
    }

    /// Catalog index of an action
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnknownAction`] if no action has this name
    pub fn position(&self, name: &str) -> Result<usize> {
        self.actions
            .iter()
            .position(|action| action.name() == name)
            .ok_or_else(|| LoadError::UnknownAction(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Action>> {
        self.actions.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|action| action.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Action reporting a fixed number of failures and counting its runs
    pub struct Fake {
        pub name: &'static str,
        pub failures: usize,
        pub runs: AtomicUsize,
    }

    impl Fake {
        pub fn new(name: &'static str, failures: usize) -> Arc<Self> {
            Arc::new(Self {
                name,
                failures,
                runs: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Action for Fake {
        fn name(&self) -> &str {
            self.name
        }

        async fn execute(&self, _ctx: &Context) -> Result<Vec<Failure>> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.failures)
                .map(|i| Failure {
                    action: self.name.to_string(),
                    method: Method::POST,
                    url: format!("http://localhost/admin/{}/{i}", self.name),
                    status: Some(StatusCode::BAD_REQUEST),
                    body: format!("{} failed {i}", self.name),
                })
                .collect())
        }
    }

    pub fn catalog(names: &[&'static str]) -> Catalog {
        Catalog::new(
            names
                .iter()
                .map(|&name| Fake::new(name, 0) as Arc<dyn Action>)
                .collect(),
        )
        .unwrap()
    }

    pub fn context() -> Context {
        Context {
            datasets: Vec::new(),
            cqpp_dir: None,
            decode_dir: None,
            json_dir: PathBuf::from("gen"),
            parallelism: None,
            update: false,
            decode_source: None,
            client: AdminClient::new("http://localhost:8081/admin", None, true).unwrap(),
        }
    }

    #[test]
    fn test_catalog_order_and_lookup() {
        let catalog = catalog(&["A", "B", "C"]);
        assert_eq!(catalog.names(), vec!["A", "B", "C"]);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.lookup("B").unwrap().name(), "B");
        assert_eq!(catalog.position("C").unwrap(), 2);
    }

    #[test]
    fn test_catalog_unknown_action() {
        let catalog = catalog(&["A"]);
        let err = catalog.lookup("Z").unwrap_err();
        assert!(matches!(err, LoadError::UnknownAction(name) if name == "Z"));
        assert!(catalog.position("Z").is_err());
    }

    #[test]
    fn test_catalog_duplicate_action() {
        let err = Catalog::new(vec![
            Fake::new("A", 0) as Arc<dyn Action>,
            Fake::new("B", 0),
            Fake::new("A", 0),
        ])
        .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateAction(name) if name == "A"));
    }

    #[test]
    fn test_context_urls() {
        let mut ctx = context();
        let dataset = Dataset {
            id: "ds1".to_string(),
            name: "first".to_string(),
            label: "First".to_string(),
            weight: 0,
            sources: std::collections::BTreeSet::new(),
        };

        assert_eq!(ctx.datasets_url(), "http://localhost:8081/admin/datasets");
        assert_eq!(
            ctx.dataset_url(&dataset, "tables"),
            "http://localhost:8081/admin/datasets/first/tables"
        );
        assert_eq!(ctx.upload_method(), Method::POST);

        ctx.update = true;
        assert_eq!(ctx.upload_method(), Method::PUT);
    }
}

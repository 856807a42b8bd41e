mod run;

use crate::pipeline::Selection;
use std::{num::NonZeroUsize, path::PathBuf, time::Duration};

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Load {
        /// Dataset ids or tags, `^` prefixed ones exclude
        datasets: Vec<String>,
        datasets_file: PathBuf,
        selection: Selection,
        cqpp: Option<PathBuf>,
        decode: Option<PathBuf>,
        decode_source: Option<String>,
        json: PathBuf,
        parallelism: Option<NonZeroUsize>,
        delay: Duration,
        update: bool,
        dry_run: bool,
        token: Option<String>,
        /// e.g. `http://localhost:8081/admin`
        api_url: String,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails to execute
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_action_debug() {
        let action = Action::Load {
            datasets: vec!["adb".to_string()],
            datasets_file: PathBuf::from("datasets.json"),
            selection: Selection::From("table".to_string()),
            cqpp: None,
            decode: None,
            decode_source: None,
            json: PathBuf::from("./gen"),
            parallelism: NonZeroUsize::new(2),
            delay: Duration::from_secs(5),
            update: false,
            dry_run: true,
            token: None,
            api_url: "http://localhost:8081/admin".to_string(),
        };

        let debug_str = format!("{action:?}");
        assert!(debug_str.contains("Load"));
        assert!(debug_str.contains("From(\"table\")"));
    }
}

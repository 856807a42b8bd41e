use super::{Action, Context};
use crate::{api::Failure, error::Result};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};

/// Outcome of a run
#[derive(Debug, Default)]
pub struct Summary {
    /// Names of the executed actions, in execution order
    pub executed: Vec<String>,
    pub failures: Vec<Failure>,
}

impl Summary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Execute the selected actions one after another.
///
/// Failures of one action don't stop the following ones; they are collected
/// and reported together once every action ran. Between two actions the run
/// pauses for `delay` so the remote side can pick up what the previous action
/// created.
///
/// # Errors
///
/// Returns an error if an action rejects the context, before anything runs.
/// Otherwise returns the first error an action raises; no later action runs
pub async fn run(
    selected: &[Arc<dyn Action>],
    ctx: &Context,
    delay: Duration,
) -> Result<Summary> {
    for action in selected {
        action.check(ctx)?;
    }

    let mut summary = Summary::default();

    for (index, action) in selected.iter().enumerate() {
        info!("BEGIN {}", action.name());

        let failures = action.execute(ctx).await?;
        if failures.is_empty() {
            info!("END {}", action.name());
        } else {
            error!("END {} with {} failed calls", action.name(), failures.len());
        }

        summary.executed.push(action.name().to_string());
        summary.failures.extend(failures);

        if index + 1 < selected.len() && !delay.is_zero() {
            debug!("Waiting {}s before the next action", delay.as_secs_f32());
            tokio::time::sleep(delay).await;
        }
    }

    if !summary.is_success() {
        let errors: Vec<String> = summary
            .failures
            .iter()
            .filter(|failure| !failure.body.is_empty())
            .map(ToString::to_string)
            .collect();
        error!(
            "Failed with {} errors:\n\t{}",
            summary.failures.len(),
            errors.join("\n\t")
        );
    }

    Ok(summary)
}

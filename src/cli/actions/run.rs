use super::Action;
use crate::{
    actions,
    api::AdminClient,
    dataset,
    error::LoadError,
    pipeline::{self, Context, EXCLUDE_MARKER},
};
use anyhow::{Context as _, Result};
use tracing::info;

/// Execute the action's business logic by delegating to the appropriate module
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Load {
            datasets,
            datasets_file,
            selection,
            cqpp,
            decode,
            decode_source,
            json,
            parallelism,
            delay,
            update,
            dry_run,
            token,
            api_url,
        } => {
            let catalog = actions::default_catalog()?;
            let selected = pipeline::resolve(&selection, &catalog, EXCLUDE_MARKER)?;

            let available = dataset::load_catalog(&datasets_file)
                .context("Failed to load the dataset catalog")?;
            let datasets = dataset::resolve(&datasets, &available)?;

            let client = AdminClient::new(&api_url, token.as_deref(), dry_run)?;
            info!(
                "Running {:?} on datasets {:?} against {}",
                selected.iter().map(|action| action.name()).collect::<Vec<_>>(),
                datasets.iter().map(|dataset| dataset.id.as_str()).collect::<Vec<_>>(),
                client.base_url()
            );
            if client.is_dry_run() {
                info!("Dry run, nothing is sent");
            }

            let ctx = Context {
                datasets,
                cqpp_dir: cqpp,
                decode_dir: decode,
                json_dir: json,
                parallelism,
                update,
                decode_source,
                client,
            };

            let summary = pipeline::run(&selected, &ctx, delay).await?;
            if !summary.is_success() {
                return Err(LoadError::Failed(summary.failures.len()).into());
            }

            info!("Finished {} actions", summary.executed.len());
            Ok(())
        }
    }
}

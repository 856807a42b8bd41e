use super::send;
use crate::{
    api::{Failure, Payload},
    error::Result,
    pipeline::{Action, Context},
};
use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

/// Ask the server to recompute the matching statistics of every dataset
pub struct UpdateMatchingStats;

#[async_trait]
impl Action for UpdateMatchingStats {
    fn name(&self) -> &str {
        "update"
    }

    async fn execute(&self, ctx: &Context) -> Result<Vec<Failure>> {
        info!("Submit UpdateMatchingStats");

        let mut failures = Vec::new();
        for dataset in &ctx.datasets {
            let url = ctx.dataset_url(dataset, "update-matching-stats");
            let msg = format!("Execute updateMatchingStats for dataset {}", dataset.name);

            if let Some(failure) =
                send(ctx, self.name(), Method::POST, &url, Payload::Empty, &msg).await
            {
                failures.push(failure);
            }
        }

        Ok(failures)
    }
}

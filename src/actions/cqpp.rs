//! Bounded concurrent upload of preprocessed binary chunks
//!
//! Every chunk file becomes one spawned task. A task holds a permit of its
//! dataset's pool for the duration of its call, so at most `parallelism`
//! chunks of a dataset are in flight. Without `parallelism` all datasets share
//! one single-permit pool and the whole run uploads one chunk at a time.

use super::{open, send};
use crate::{
    api::{Failure, OCTET_STREAM, Payload},
    artifacts::{self, Pattern},
    dataset::Dataset,
    error::{LoadError, Result},
    pipeline::{Action, Context},
};
use async_trait::async_trait;
use std::{
    future::Future,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Semaphore;
use tracing::{info, warn};

const CHUNKS: Pattern = Pattern::suffix(".cqpp");

/// One chunk waiting for its upload
#[derive(Debug)]
pub struct UploadTask {
    pub dataset: Dataset,
    pub file: PathBuf,
    permits: Arc<Semaphore>,
}

/// Find the chunks of every dataset under `{root}/{dataset.id}/cqpp` and assign
/// each its dataset's permit pool
///
/// # Errors
///
/// Returns an error if a chunk directory can't be read
pub fn plan(
    datasets: &[Dataset],
    root: &Path,
    parallelism: Option<NonZeroUsize>,
) -> Result<Vec<UploadTask>> {
    let shared = Arc::new(Semaphore::new(1));
    let mut tasks = Vec::new();

    for dataset in datasets {
        let permits = match parallelism {
            Some(slots) => Arc::new(Semaphore::new(slots.get().min(Semaphore::MAX_PERMITS))),
            None => Arc::clone(&shared),
        };

        for file in artifacts::discover(&root.join(&dataset.id).join("cqpp"), CHUNKS)? {
            tasks.push(UploadTask {
                dataset: dataset.clone(),
                file,
                permits: Arc::clone(&permits),
            });
        }
    }

    Ok(tasks)
}

/// Run `upload` for every task, bounded by the task's permit pool, and wait
/// for all of them.
///
/// A failing task doesn't affect its siblings. The permit is released when the
/// task finishes, whatever the outcome.
///
/// # Errors
///
/// Returns an error if a task panicked
pub async fn schedule<F, Fut>(tasks: Vec<UploadTask>, upload: F) -> Result<Vec<Failure>>
where
    F: Fn(Dataset, PathBuf) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Failure>> + Send + 'static,
{
    let upload = Arc::new(upload);

    let handles: Vec<_> = tasks
        .into_iter()
        .map(|task| {
            let upload = Arc::clone(&upload);
            tokio::spawn(async move {
                let _permit = task.permits.acquire_owned().await?;
                Ok::<_, LoadError>(upload(task.dataset, task.file).await)
            })
        })
        .collect();

    let mut failures = Vec::new();
    for result in futures::future::join_all(handles).await {
        if let Some(failure) = result?? {
            failures.push(failure);
        }
    }

    Ok(failures)
}

/// Upload the binary chunks of every dataset
pub struct UploadChunks;

#[async_trait]
impl Action for UploadChunks {
    fn name(&self) -> &str {
        "cqpp"
    }

    fn check(&self, ctx: &Context) -> Result<()> {
        chunk_root(ctx).map(|_| ())
    }

    async fn execute(&self, ctx: &Context) -> Result<Vec<Failure>> {
        let tasks = plan(&ctx.datasets, chunk_root(ctx)?, ctx.parallelism)?;
        match ctx.parallelism {
            Some(slots) => info!(
                "Uploading {} chunks using {slots} uploads per dataset",
                tasks.len()
            ),
            None => info!("Uploading {} chunks sequentially", tasks.len()),
        }

        let shared = Arc::new(ctx.clone());
        let failures = schedule(tasks, move |dataset, file| {
            let ctx = Arc::clone(&shared);
            async move { upload_chunk(&ctx, &dataset, &file).await }
        })
        .await?;

        Ok(failures)
    }
}

fn chunk_root(ctx: &Context) -> Result<&Path> {
    ctx.cqpp_dir.as_deref().ok_or(LoadError::MissingDirectory {
        action: "cqpp",
        flag: "--cqpp",
    })
}

async fn upload_chunk(ctx: &Context, dataset: &Dataset, file: &Path) -> Option<Failure> {
    let method = ctx.upload_method();
    let url = ctx.dataset_url(dataset, "cqpp");

    let payload = match open(file).await {
        Ok(handle) => Payload::File(handle, OCTET_STREAM),
        Err(err) => {
            warn!("Failed to upload cqpp {}: {err}", file.display());
            return Some(Failure::transport("cqpp", method, &url, &err));
        }
    };

    let msg = format!("Upload cqpp {} to {dataset}", file.display());
    send(ctx, "cqpp", method, &url, payload, &msg).await
}

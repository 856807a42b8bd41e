//! The upload actions, in dependency order
//!
//! Every action walks the datasets of the run, finds its artifacts below the
//! dataset's directory and issues one call per artifact. Only `cqpp` uploads
//! concurrently, see [`cqpp`].

pub mod cqpp;
pub mod dataset;
pub mod decoding;
pub mod json;
pub mod single;
pub mod update;

use crate::{
    api::{Failure, Payload, log_reply},
    error::{LoadError, Result},
    pipeline::{Action, Catalog, Context},
};
use reqwest::Method;
use std::{path::Path, sync::Arc};
use tracing::warn;

/// Names of the default catalog, in execution order
pub const NAMES: [&str; 11] = [
    "dataset",
    "mapping",
    "secondaryid",
    "search",
    "table",
    "concept",
    "cqpp",
    "structure",
    "preview",
    "decoding",
    "update",
];

/// The catalog of all upload actions, ordered so every action finds what it
/// references already created
///
/// # Errors
///
/// Returns an error if two actions share a name
pub fn default_catalog() -> Result<Catalog> {
    let actions: Vec<Arc<dyn Action>> = vec![
        Arc::new(dataset::CreateDatasets),
        Arc::new(json::JsonUpload::MAPPING),
        Arc::new(json::JsonUpload::SECONDARY_ID),
        Arc::new(json::JsonUpload::SEARCH_INDEX),
        Arc::new(json::JsonUpload::TABLE),
        Arc::new(json::JsonUpload::CONCEPT),
        Arc::new(cqpp::UploadChunks),
        Arc::new(single::SingleUpload::STRUCTURE),
        Arc::new(single::SingleUpload::PREVIEW),
        Arc::new(decoding::UploadDecodings),
        Arc::new(update::UpdateMatchingStats),
    ];

    Catalog::new(actions)
}

/// Open an artifact for streaming
pub(crate) async fn open(path: &Path) -> Result<tokio::fs::File> {
    tokio::fs::File::open(path)
        .await
        .map_err(|e| LoadError::io(path, e))
}

/// Send one call, log its outcome and turn anything but a success into a
/// [`Failure`]
pub(crate) async fn send(
    ctx: &Context,
    action: &str,
    method: Method,
    url: &str,
    payload: Payload,
    msg: &str,
) -> Option<Failure> {
    match ctx.client.request(method.clone(), url, payload).await {
        Ok(reply) => {
            log_reply(
                &format!("{msg} with response {}", reply.status.as_u16()),
                &reply,
            );
            if reply.is_success() {
                None
            } else {
                Some(Failure::from_reply(action, method, url, reply))
            }
        }
        Err(err) => {
            warn!("{msg} failed: {err}");
            Some(Failure::transport(action, method, url, &err))
        }
    }
}

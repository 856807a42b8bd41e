use super::send;
use crate::{
    api::{Failure, OCTET_STREAM, Payload},
    artifacts::{self, Pattern},
    error::{LoadError, Result},
    pipeline::{Action, Context},
};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::{io::Read, path::Path};
use tracing::debug;

/// Source tag whose datasets get their decoding files uploaded by default
pub const DEFAULT_SOURCE: &str = "adb";

const DECODING: Pattern = Pattern {
    prefix: "decoding.",
    suffix: ".csv.gz",
};

/// Upload the id decoding file of each dataset, decompressed
pub struct UploadDecodings;

fn gunzip(path: &Path) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let mut data = Vec::new();
    GzDecoder::new(file)
        .read_to_end(&mut data)
        .map_err(|e| LoadError::io(path, e))?;
    Ok(data)
}

fn decode_root(ctx: &Context) -> Result<&Path> {
    ctx.decode_dir.as_deref().ok_or(LoadError::MissingDirectory {
        action: "decoding",
        flag: "--decode",
    })
}

#[async_trait]
impl Action for UploadDecodings {
    fn name(&self) -> &str {
        "decoding"
    }

    fn check(&self, ctx: &Context) -> Result<()> {
        decode_root(ctx).map(|_| ())
    }

    async fn execute(&self, ctx: &Context) -> Result<Vec<Failure>> {
        let root = decode_root(ctx)?;

        let method = ctx.upload_method();
        let mut failures = Vec::new();

        for dataset in &ctx.datasets {
            if let Some(source) = &ctx.decode_source
                && !dataset.sources.contains(source)
            {
                debug!("Skipping {dataset}, not a {source} dataset");
                continue;
            }

            let decoding = artifacts::single(&root.join(&dataset.id).join("csv"), DECODING)?;
            let msg = format!("Upload decoding file {} for {dataset}", decoding.display());

            let data = tokio::task::spawn_blocking(move || gunzip(&decoding)).await??;
            let url = ctx.dataset_url(dataset, "mapping");

            if let Some(failure) = send(
                ctx,
                self.name(),
                method.clone(),
                &url,
                Payload::Bytes(data, OCTET_STREAM),
                &msg,
            )
            .await
            {
                failures.push(failure);
            }
        }

        Ok(failures)
    }
}

use super::{open, send};
use crate::{
    api::{Failure, JSON, Payload},
    dataset::Dataset,
    error::{LoadError, Result},
    pipeline::{Action, Context},
};
use async_trait::async_trait;
use tracing::info;

/// Upload one well-known json file per dataset
#[derive(Debug, Clone, Copy)]
pub struct SingleUpload {
    name: &'static str,
    /// File name below `{json}/{dataset.id}`
    file_name: fn(&Dataset) -> String,
    endpoint: &'static str,
    /// Whether a dataset without the file aborts the run
    required: bool,
}

fn structure_file(dataset: &Dataset) -> String {
    format!("structure_{}.json", dataset.id)
}

fn preview_file(_: &Dataset) -> String {
    "preview.json".to_string()
}

impl SingleUpload {
    pub const STRUCTURE: Self = Self {
        name: "structure",
        file_name: structure_file,
        endpoint: "structure",
        required: true,
    };

    pub const PREVIEW: Self = Self {
        name: "preview",
        file_name: preview_file,
        endpoint: "preview",
        required: false,
    };
}

#[async_trait]
impl Action for SingleUpload {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, ctx: &Context) -> Result<Vec<Failure>> {
        let method = ctx.upload_method();
        let mut failures = Vec::new();

        for dataset in &ctx.datasets {
            let dir = ctx.json_dir.join(&dataset.id);
            let file_name = (self.file_name)(dataset);
            let file = dir.join(&file_name);

            if !file.is_file() {
                if self.required {
                    return Err(LoadError::MissingArtifact {
                        dir,
                        pattern: file_name,
                    });
                }
                info!("No {} for dataset {}, skipping", self.name, dataset.name);
                continue;
            }

            let payload = Payload::File(open(&file).await?, JSON);
            let url = ctx.dataset_url(dataset, self.endpoint);
            let msg = format!("Upload {} json for dataset {}", self.name, dataset.id);

            if let Some(failure) = send(ctx, self.name, method.clone(), &url, payload, &msg).await {
                failures.push(failure);
            }
        }

        Ok(failures)
    }
}

use super::{open, send};
use crate::{
    api::{Failure, JSON, Payload},
    artifacts::{self, Pattern},
    error::Result,
    pipeline::{Action, Context},
};
use async_trait::async_trait;

/// Upload every json artifact of a dataset sub-directory to one endpoint
#[derive(Debug, Clone, Copy)]
pub struct JsonUpload {
    name: &'static str,
    /// Directory below `{json}/{dataset.id}`
    dir: &'static str,
    pattern: Pattern,
    endpoint: &'static str,
    /// What is uploaded, for log messages
    kind: &'static str,
    /// Stripped from file names in log messages
    stem_suffix: &'static str,
}

impl JsonUpload {
    pub const MAPPING: Self = Self {
        name: "mapping",
        dir: "mappings",
        pattern: Pattern::suffix(".json"),
        endpoint: "internToExtern",
        kind: "internToExtern mapping",
        stem_suffix: ".mapping.json",
    };

    pub const SECONDARY_ID: Self = Self {
        name: "secondaryid",
        dir: "secondaryIds",
        pattern: Pattern::suffix(".json"),
        endpoint: "secondaryId",
        kind: "secondaryId",
        stem_suffix: ".import.json",
    };

    pub const SEARCH_INDEX: Self = Self {
        name: "search",
        dir: "searchIndex",
        pattern: Pattern::suffix(".json"),
        endpoint: "searchIndex",
        kind: "search index",
        stem_suffix: ".filter.json",
    };

    pub const TABLE: Self = Self {
        name: "table",
        dir: "tables",
        pattern: Pattern::suffix(".table.json"),
        endpoint: "tables",
        kind: "table",
        stem_suffix: ".table.json",
    };

    pub const CONCEPT: Self = Self {
        name: "concept",
        dir: "concepts",
        pattern: Pattern::suffix(".concept.json"),
        endpoint: "concepts",
        kind: "concept",
        stem_suffix: ".concept.json",
    };
}

#[async_trait]
impl Action for JsonUpload {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, ctx: &Context) -> Result<Vec<Failure>> {
        let method = ctx.upload_method();
        let verb = if ctx.update { "Update" } else { "Upload" };
        let mut failures = Vec::new();

        for dataset in &ctx.datasets {
            let dir = ctx.json_dir.join(&dataset.id).join(self.dir);
            let url = ctx.dataset_url(dataset, self.endpoint);

            for file in artifacts::discover(&dir, self.pattern)? {
                let payload = Payload::File(open(&file).await?, JSON);
                let msg = format!(
                    "{verb} {} {}.{}",
                    self.kind,
                    dataset.name,
                    artifacts::stem(&file, self.stem_suffix)
                );

                if let Some(failure) =
                    send(ctx, self.name, method.clone(), &url, payload, &msg).await
                {
                    failures.push(failure);
                }
            }
        }

        Ok(failures)
    }
}

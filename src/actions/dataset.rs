use super::send;
use crate::{
    api::{Failure, Payload},
    error::Result,
    pipeline::{Action, Context},
};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::info;

/// Create every dataset of the run
pub struct CreateDatasets;

#[async_trait]
impl Action for CreateDatasets {
    fn name(&self) -> &str {
        "dataset"
    }

    async fn execute(&self, ctx: &Context) -> Result<Vec<Failure>> {
        let names: Vec<&str> = ctx.datasets.iter().map(|d| d.name.as_str()).collect();
        info!("Uploading datasets {}", names.join(", "));

        let url = ctx.datasets_url();
        let mut failures = Vec::new();

        for dataset in &ctx.datasets {
            let payload = Payload::Json(json!({
                "name": dataset.name,
                "label": dataset.label,
                "weight": dataset.weight,
            }));
            let msg = format!("Creating dataset {}", dataset.name);

            if let Some(failure) = send(ctx, self.name(), Method::POST, &url, payload, &msg).await {
                failures.push(failure);
            }
        }

        Ok(failures)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::actions::tests::{context, dataset};
    use reqwest::StatusCode;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    #[tokio::test]
    async fn test_create_datasets() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/datasets"))
            .and(body_json(json!({"name": "first", "label": "FIRST", "weight": 0})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/admin/datasets"))
            .and(body_json(json!({"name": "second", "label": "SECOND", "weight": 0})))
            .respond_with(ResponseTemplate::new(400).set_body_string("exists"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = context(
            &server.uri(),
            dir.path(),
            vec![dataset("ds1", "first"), dataset("ds2", "second")],
        );

        let failures = CreateDatasets.execute(&ctx).await.unwrap();
        assert_eq!(failures.len(), 1);

        let failure = failures.first().unwrap();
        assert_eq!(failure.action, "dataset");
        assert_eq!(failure.status, Some(StatusCode::BAD_REQUEST));
        assert_eq!(failure.body, "exists");
    }

    #[tokio::test]
    async fn test_no_datasets_no_calls() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&server.uri(), dir.path(), Vec::new());

        let failures = CreateDatasets.execute(&ctx).await.unwrap();
        assert!(failures.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

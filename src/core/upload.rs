use crate::domain::model::{Archive, DepositionMetadata, UploadOutcome};
use crate::domain::ports::DepositionApi;
use crate::utils::error::Result;

/// Runs create, upload and (optionally) publish against a [`DepositionApi`].
///
/// Calls are strictly sequential and the first failure aborts the rest. A
/// deposition created before a failure is left on the server as a draft.
pub struct UploadEngine<A: DepositionApi> {
    api: A,
    publish: bool,
}

impl<A: DepositionApi> UploadEngine<A> {
    pub fn new(api: A) -> Self {
        Self { api, publish: true }
    }

    pub fn with_publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub async fn run(&self, metadata: &DepositionMetadata, archive: Archive) -> Result<UploadOutcome> {
        tracing::info!("Starting upload of '{}'", metadata.title);

        let draft = self.api.create(metadata).await?;
        self.api.upload(&draft, archive).await?;

        let (deposition, published) = if self.publish {
            (self.api.publish(&draft).await?, true)
        } else {
            tracing::info!("Skipping publish; deposition {} stays a draft", draft.id);
            (draft, false)
        };

        let html_url = deposition
            .links
            .html
            .clone()
            .unwrap_or_else(|| self.api.fallback_html_url(deposition.id, published));

        Ok(UploadOutcome {
            deposition_id: deposition.id,
            published,
            html_url,
            response: deposition.raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::MetadataBuilder;
    use crate::domain::model::{Deposition, DepositionLinks};
    use crate::utils::error::ZenodoError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockApi {
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail_on: Option<&'static str>,
    }

    impl MockApi {
        fn failing_on(operation: &'static str) -> Self {
            Self {
                fail_on: Some(operation),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, operation: &'static str) -> Result<()> {
            self.calls.lock().unwrap().push(operation);
            if self.fail_on == Some(operation) {
                return Err(ZenodoError::HttpStatus {
                    operation,
                    status: 500,
                    body: "internal error".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DepositionApi for MockApi {
        async fn create(&self, _metadata: &DepositionMetadata) -> Result<Deposition> {
            self.record("create")?;
            Ok(Deposition {
                id: 5,
                links: DepositionLinks {
                    bucket: Some("https://zenodo.test/api/files/b".to_string()),
                    publish: Some("https://zenodo.test/publish".to_string()),
                    html: None,
                },
                raw: serde_json::json!({"id": 5, "state": "unsubmitted"}),
            })
        }

        async fn upload(&self, _deposition: &Deposition, _archive: Archive) -> Result<serde_json::Value> {
            self.record("upload")?;
            Ok(serde_json::json!({"key": "a.zip"}))
        }

        async fn publish(&self, deposition: &Deposition) -> Result<Deposition> {
            self.record("publish")?;
            Ok(Deposition {
                id: deposition.id,
                links: DepositionLinks {
                    html: Some("https://zenodo.test/records/5".to_string()),
                    ..DepositionLinks::default()
                },
                raw: serde_json::json!({"id": 5, "state": "done", "submitted": true}),
            })
        }

        fn fallback_html_url(&self, deposition_id: u64, published: bool) -> String {
            let kind = if published { "records" } else { "deposit" };
            format!("https://zenodo.test/{}/{}", kind, deposition_id)
        }
    }

    fn metadata() -> DepositionMetadata {
        MetadataBuilder::new()
            .title("Snapshot")
            .creator("Doe, Jane")
            .build()
            .unwrap()
    }

    fn archive() -> Archive {
        Archive {
            file_name: "a.zip".to_string(),
            bytes: vec![1, 2, 3],
            entries: vec![],
        }
    }

    #[tokio::test]
    async fn test_run_publishes_by_default() {
        let api = MockApi::default();
        let engine = UploadEngine::new(api.clone());

        let outcome = engine.run(&metadata(), archive()).await.unwrap();

        assert_eq!(api.calls(), vec!["create", "upload", "publish"]);
        assert!(outcome.published);
        assert_eq!(outcome.html_url, "https://zenodo.test/records/5");
        assert_eq!(outcome.response["state"], "done");
    }

    #[tokio::test]
    async fn test_run_without_publish_makes_two_calls() {
        let api = MockApi::default();
        let engine = UploadEngine::new(api.clone()).with_publish(false);

        let outcome = engine.run(&metadata(), archive()).await.unwrap();

        assert_eq!(api.calls(), vec!["create", "upload"]);
        assert!(!outcome.published);
        assert_eq!(outcome.deposition_id, 5);
        assert_eq!(outcome.html_url, "https://zenodo.test/deposit/5");
        assert_eq!(outcome.response["state"], "unsubmitted");
    }

    #[tokio::test]
    async fn test_create_failure_stops_before_upload() {
        let api = MockApi::failing_on("create");
        let engine = UploadEngine::new(api.clone());

        let err = engine.run(&metadata(), archive()).await.unwrap_err();

        assert_eq!(api.calls(), vec!["create"]);
        assert!(matches!(err, ZenodoError::HttpStatus { operation: "create", .. }));
    }

    #[tokio::test]
    async fn test_upload_failure_skips_publish() {
        let api = MockApi::failing_on("upload");
        let engine = UploadEngine::new(api.clone());

        assert!(engine.run(&metadata(), archive()).await.is_err());
        assert_eq!(api.calls(), vec!["create", "upload"]);
    }

    #[tokio::test]
    async fn test_publish_failure_is_reported() {
        let api = MockApi::failing_on("publish");
        let engine = UploadEngine::new(api.clone());

        let err = engine.run(&metadata(), archive()).await.unwrap_err();
        assert_eq!(api.calls(), vec!["create", "upload", "publish"]);
        assert_eq!(err.exit_code(), 4);
    }
}

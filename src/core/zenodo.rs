use crate::domain::model::{Archive, Deposition, DepositionLinks, DepositionMetadata};
use crate::domain::ports::DepositionApi;
use crate::utils::error::{Result, ZenodoError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

pub const PRODUCTION_BASE_URL: &str = "https://zenodo.org";
pub const SANDBOX_BASE_URL: &str = "https://sandbox.zenodo.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZenodoEnvironment {
    Production,
    Sandbox,
}

impl ZenodoEnvironment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            ZenodoEnvironment::Sandbox
        } else {
            ZenodoEnvironment::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            ZenodoEnvironment::Production => PRODUCTION_BASE_URL,
            ZenodoEnvironment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

/// Thin client over the Zenodo deposition REST API.
pub struct ZenodoClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl ZenodoClient {
    pub fn new(environment: ZenodoEnvironment, token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(environment.base_url(), token)
    }

    pub fn with_base_url(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn depositions_url(&self) -> Result<Url> {
        Ok(self.base_url.join("api/deposit/depositions")?)
    }

    fn bucket_file_url(deposition: &Deposition, file_name: &str) -> Result<Url> {
        let bucket = deposition
            .links
            .bucket
            .as_deref()
            .ok_or(ZenodoError::UnexpectedResponse {
                operation: "create",
                message: "deposition has no links.bucket".to_string(),
            })?;

        let mut url = Url::parse(bucket)?;
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|_| ZenodoError::UnexpectedResponse {
                        operation: "create",
                        message: format!("bucket link cannot take a file name: {}", bucket),
                    })?;
            segments.pop_if_empty().push(file_name);
        }
        Ok(url)
    }
}

#[derive(Serialize)]
struct DepositionBody<'a> {
    metadata: &'a DepositionMetadata,
}

/// Reads the body and fails on any non-2xx status.
async fn read_json(operation: &'static str, response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    let body = response.text().await?;

    tracing::debug!("Zenodo {} response status: {}", operation, status);

    if !status.is_success() {
        return Err(ZenodoError::HttpStatus {
            operation,
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

fn parse_deposition(operation: &'static str, raw: serde_json::Value) -> Result<Deposition> {
    let id = raw
        .get("id")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| ZenodoError::UnexpectedResponse {
            operation,
            message: "response has no numeric id".to_string(),
        })?;

    let links = match raw.get("links") {
        Some(links) => serde_json::from_value::<DepositionLinks>(links.clone())?,
        None => DepositionLinks::default(),
    };

    Ok(Deposition { id, links, raw })
}

#[async_trait]
impl DepositionApi for ZenodoClient {
    async fn create(&self, metadata: &DepositionMetadata) -> Result<Deposition> {
        let url = self.depositions_url()?;
        tracing::debug!("Creating deposition at {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&DepositionBody { metadata })
            .send()
            .await?;

        let deposition = parse_deposition("create", read_json("create", response).await?)?;
        tracing::info!("Created deposition {}", deposition.id);
        Ok(deposition)
    }

    async fn upload(&self, deposition: &Deposition, archive: Archive) -> Result<serde_json::Value> {
        let url = Self::bucket_file_url(deposition, &archive.file_name)?;
        tracing::info!(
            "Uploading {} ({} bytes) to deposition {}",
            archive.file_name,
            archive.size(),
            deposition.id
        );

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(archive.bytes)
            .send()
            .await?;

        read_json("upload", response).await
    }

    async fn publish(&self, deposition: &Deposition) -> Result<Deposition> {
        let link = deposition
            .links
            .publish
            .as_deref()
            .ok_or(ZenodoError::UnexpectedResponse {
                operation: "create",
                message: "deposition has no links.publish".to_string(),
            })?;
        let url = Url::parse(link)?;
        tracing::info!("Publishing deposition {}", deposition.id);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        parse_deposition("publish", read_json("publish", response).await?)
    }

    fn fallback_html_url(&self, deposition_id: u64, published: bool) -> String {
        let path = if published {
            format!("records/{}", deposition_id)
        } else {
            format!("deposit/{}", deposition_id)
        };
        self.base_url
            .join(&path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.base_url, path))
    }
}

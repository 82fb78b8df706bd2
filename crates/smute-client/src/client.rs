//! Job service HTTP client.

use std::path::Path;

use futures::StreamExt;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use smute_models::{AssetId, JobId, JobMetadata, RemoteJob};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Upload response wire format.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: AssetId,
}

/// Envelope the service wraps job objects in.
#[derive(Debug, Deserialize)]
struct JobEnvelope {
    job: RemoteJob,
}

/// Job creation request wire format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobRequest<'a> {
    asset_id: &'a AssetId,
    metadata: &'a JobMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

/// Client for the remote job service.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct JobClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl JobClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::Network)?;
        Ok(Self { http, config })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Upload a local file, obtaining the asset id the service stored it as.
    pub async fn upload(&self, path: impl AsRef<Path>) -> ClientResult<AssetId> {
        let path = path.as_ref();
        let url = format!("{}/upload/", self.config.base_url);

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Upload(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("input")
            .to_string();

        debug!(path = %path.display(), url = %url, "Uploading input asset");

        let form =
            multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Upload(format!(
                "service returned {status}: {body}"
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;
        Ok(upload.id)
    }

    /// Create a job against an uploaded asset.
    pub async fn create_job(
        &self,
        asset_id: &AssetId,
        metadata: &JobMetadata,
        callback_url: Option<&str>,
    ) -> ClientResult<RemoteJob> {
        let url = format!("{}/job/", self.config.base_url);

        debug!(asset_id = %asset_id, model = %metadata.name, "Creating remote job");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&CreateJobRequest {
                asset_id,
                metadata,
                callback_url,
            })
            .send()
            .await
            .map_err(|e| ClientError::Submission(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Submission(format!(
                "service returned {status}: {body}"
            )));
        }

        let envelope: JobEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Submission(e.to_string()))?;
        Ok(envelope.job)
    }

    /// Fetch a job's current state.
    pub async fn get_job(&self, job_id: &JobId) -> ClientResult<RemoteJob> {
        let url = format!("{}/job/{}", self.config.base_url, job_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::RequestFailed(format!(
                "job fetch returned {status}: {body}"
            )));
        }

        let envelope: JobEnvelope = response.json().await?;
        Ok(envelope.job)
    }

    /// Download an output asset to a local file, streaming in chunks.
    ///
    /// Output links are presigned, so no auth header is attached. The body
    /// is written chunk by chunk; a whole asset is never held in memory.
    pub async fn download_to_file(
        &self,
        link: &str,
        destination: impl AsRef<Path>,
    ) -> ClientResult<()> {
        let destination = destination.as_ref();

        let response = self
            .http
            .get(link)
            .send()
            .await
            .map_err(|e| ClientError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Download(format!(
                "asset fetch returned {}",
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(destination).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ClientError::Download(e.to_string()))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(link = %link, destination = %destination.display(), "Downloaded output asset");
        Ok(())
    }
}

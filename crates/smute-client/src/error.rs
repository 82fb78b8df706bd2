//! Client error types.

use smute_models::{JobId, JobStatus};
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Job submission failed: {0}")]
    Submission(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Job {job_id} failed with status {status}: {detail}")]
    RemoteJob {
        job_id: JobId,
        status: JobStatus,
        detail: String,
    },

    #[error("Job {job_id} timed out after {elapsed_secs}s")]
    Timeout { job_id: JobId, elapsed_secs: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Remote asset and job definitions.
//!
//! These types mirror the job service's wire format. A job is created
//! against an uploaded asset, then observed by polling until it reaches a
//! terminal status. Nothing here is mutated locally once the service has
//! reported a terminal state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an uploaded input asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a submitted remote job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote job status as reported by the service.
///
/// A status string the service has not documented is mapped to `Unknown`
/// and treated as in-progress, so polling keeps going instead of aborting
/// on a new intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Job is waiting for a worker on the service side
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed
    Failed,
    /// Job errored on the service side
    Error,
    /// Unrecognized status string, treated as in-progress
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
            JobStatus::Unknown => "unknown",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Error
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One output produced by a completed job.
///
/// The `link` is a presigned download URL; assets without a link carry
/// metadata only and are not materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputAsset {
    /// Service-reported asset filename, used to infer the extension
    #[serde(default)]
    pub name: Option<String>,
    /// Presigned download URL
    #[serde(default)]
    pub link: Option<String>,
}

impl OutputAsset {
    /// The download link, if present and non-empty.
    pub fn download_link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }

    /// File extension inferred from the reported asset name.
    pub fn extension(&self) -> Option<&str> {
        let name = self.name.as_deref()?;
        let ext = name.rsplit_once('.')?.1;
        if ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }
}

/// A remote job as observed via polling.
///
/// Owned by the service; local code never writes to it. Once the status is
/// terminal, the status and output assets are fixed for that job id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteJob {
    /// Unique job id minted by the service
    pub id: JobId,
    /// Current status
    pub status: JobStatus,
    /// Outputs, populated when the job completes
    #[serde(default)]
    pub output_assets: Vec<OutputAsset>,
    /// Service-reported error detail (failed/error jobs)
    #[serde(default)]
    pub error: Option<String>,
    /// Service-reported human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

impl RemoteJob {
    /// Diagnostic text for a failed or errored job.
    ///
    /// Absent fields are spelled out as "not available" so the final error
    /// message never interpolates a bare null.
    pub fn diagnostic(&self) -> String {
        format!(
            "error: {}, message: {}",
            self.error.as_deref().unwrap_or("not available"),
            self.message.as_deref().unwrap_or("not available"),
        )
    }
}

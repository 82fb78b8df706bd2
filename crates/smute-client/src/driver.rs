//! The submit → poll → collect state machine for one remote job.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use smute_models::{AssetId, JobMetadata, JobStatus, RemoteJob};

use crate::client::JobClient;
use crate::error::{ClientError, ClientResult};

/// Fallback extension when an output asset does not report one.
const DEFAULT_OUTPUT_EXTENSION: &str = "wav";

/// Options governing one driver run.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Wall-clock budget for the whole run
    pub timeout: Duration,
    /// Optional callback URL forwarded to the service
    pub callback_url: Option<String>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
            callback_url: None,
        }
    }
}

impl DriverOptions {
    /// Set the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Local paths of a completed job's materialized outputs.
///
/// Callers branch on the count: a job expected to produce one file gets a
/// single resolved path, anything else gets the ordered list. The two
/// shapes are kept distinct on purpose — no silent coercion either way.
#[derive(Debug, Clone)]
pub enum JobOutputs {
    /// Exactly one downloaded output
    Single(PathBuf),
    /// Zero or several downloaded outputs, in service order
    Multiple(Vec<PathBuf>),
}

impl JobOutputs {
    fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        if paths.len() == 1 {
            JobOutputs::Single(paths.remove(0))
        } else {
            JobOutputs::Multiple(paths)
        }
    }

    /// The single output path, for jobs contractually producing one file.
    pub fn into_single(self) -> ClientResult<PathBuf> {
        match self {
            JobOutputs::Single(path) => Ok(path),
            JobOutputs::Multiple(paths) => Err(ClientError::RequestFailed(format!(
                "expected exactly one output asset, got {}",
                paths.len()
            ))),
        }
    }

    /// All output paths, regardless of shape.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            JobOutputs::Single(path) => vec![path.as_path()],
            JobOutputs::Multiple(paths) => paths.iter().map(|p| p.as_path()).collect(),
        }
    }
}

/// Result of a completed driver run.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// The job as last observed, for matching results back to requests
    pub job: RemoteJob,
    /// Materialized local outputs
    pub outputs: JobOutputs,
}

/// Drives a single remote job from submission to materialized outputs.
#[derive(Debug, Clone)]
pub struct JobDriver {
    client: JobClient,
    options: DriverOptions,
}

impl JobDriver {
    /// Create a driver with the given options.
    pub fn new(client: JobClient, options: DriverOptions) -> Self {
        Self { client, options }
    }

    /// The underlying client.
    pub fn client(&self) -> &JobClient {
        &self.client
    }

    /// Upload `input` and run one job over it.
    ///
    /// Output files land in `output_dir` (created if absent) named
    /// `{input_stem}_{model}.{ext}`.
    pub async fn run(
        &self,
        input: impl AsRef<Path>,
        metadata: &JobMetadata,
        output_dir: impl AsRef<Path>,
    ) -> ClientResult<JobOutcome> {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("input")
            .to_string();

        let asset_id = self.client.upload(input).await?;
        self.run_on_asset(&asset_id, &stem, metadata, output_dir)
            .await
    }

    /// Run one job against an already uploaded asset.
    ///
    /// Used by fan-out so N jobs share a single upload. The timeout budget
    /// starts at submission; a job that is still running server-side when
    /// the budget runs out is abandoned locally, not cancelled remotely.
    pub async fn run_on_asset(
        &self,
        asset_id: &AssetId,
        input_stem: &str,
        metadata: &JobMetadata,
        output_dir: impl AsRef<Path>,
    ) -> ClientResult<JobOutcome> {
        let output_dir = output_dir.as_ref();

        let job = self
            .client
            .create_job(asset_id, metadata, self.options.callback_url.as_deref())
            .await?;
        let job_id = job.id.clone();
        let started = Instant::now();

        info!(job_id = %job_id, model = %metadata.name, "Submitted remote job");

        loop {
            let job = self.client.get_job(&job_id).await?;

            if job.status.is_terminal() {
                if job.status == JobStatus::Completed {
                    debug!(job_id = %job_id, elapsed_secs = started.elapsed().as_secs(), "Job completed");
                    return self
                        .collect_outputs(job, input_stem, metadata, output_dir)
                        .await;
                }
                return Err(ClientError::RemoteJob {
                    job_id,
                    status: job.status,
                    detail: job.diagnostic(),
                });
            }

            if started.elapsed() > self.options.timeout {
                return Err(ClientError::Timeout {
                    job_id,
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }

            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Download every linked output of a completed job.
    async fn collect_outputs(
        &self,
        job: RemoteJob,
        input_stem: &str,
        metadata: &JobMetadata,
        output_dir: &Path,
    ) -> ClientResult<JobOutcome> {
        tokio::fs::create_dir_all(output_dir).await?;

        let mut paths = Vec::new();
        for asset in &job.output_assets {
            let Some(link) = asset.download_link() else {
                continue;
            };
            let extension = asset.extension().unwrap_or(DEFAULT_OUTPUT_EXTENSION);
            let filename = format!("{input_stem}_{}.{extension}", metadata.name);
            let destination = output_dir.join(filename);
            self.client.download_to_file(link, &destination).await?;
            paths.push(destination);
        }

        info!(job_id = %job.id, outputs = paths.len(), "Materialized job outputs");

        Ok(JobOutcome {
            job,
            outputs: JobOutputs::from_paths(paths),
        })
    }
}

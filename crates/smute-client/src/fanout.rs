//! Fan-out: N independent jobs over one uploaded asset.

use std::path::Path;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use smute_models::JobMetadata;

use crate::driver::{JobDriver, JobOutcome};
use crate::error::{ClientError, ClientResult};

/// Default worker pool size for fan-out runs.
pub const DEFAULT_FAN_OUT_CONCURRENCY: usize = 5;

/// Runs several independent remote jobs concurrently against one shared
/// uploaded asset.
///
/// The input is uploaded exactly once; each metadata profile then gets its
/// own job through a bounded worker pool. Results are collected in
/// completion order, not submission order — each `JobOutcome` carries its
/// `RemoteJob` so callers can match results back to their metadata.
///
/// Failure policy: the first failure is returned to the caller immediately.
/// In-flight sibling jobs are neither awaited nor cancelled — their tasks
/// keep running detached and their results are discarded.
#[derive(Debug, Clone)]
pub struct FanOutCoordinator {
    driver: JobDriver,
    max_concurrency: usize,
}

impl FanOutCoordinator {
    /// Create a coordinator with the default pool size.
    pub fn new(driver: JobDriver) -> Self {
        Self {
            driver,
            max_concurrency: DEFAULT_FAN_OUT_CONCURRENCY,
        }
    }

    /// Override the worker pool size.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Upload `input` once, then run one job per metadata profile.
    pub async fn run_many(
        &self,
        input: impl AsRef<Path>,
        metadata_list: &[JobMetadata],
        output_dir: impl AsRef<Path>,
    ) -> ClientResult<Vec<JobOutcome>> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("input")
            .to_string();

        let asset_id = self.driver.client().upload(input).await?;

        info!(
            asset_id = %asset_id,
            jobs = metadata_list.len(),
            pool = self.max_concurrency,
            "Fanning out jobs over shared asset"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut in_flight = FuturesUnordered::new();

        for metadata in metadata_list.iter().cloned() {
            let driver = self.driver.clone();
            let asset_id = asset_id.clone();
            let stem = stem.clone();
            let output_dir = output_dir.to_path_buf();
            let semaphore = Arc::clone(&semaphore);

            in_flight.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| ClientError::RequestFailed("worker pool closed".to_string()))?;
                driver
                    .run_on_asset(&asset_id, &stem, &metadata, &output_dir)
                    .await
            }));
        }

        let mut outcomes = Vec::with_capacity(metadata_list.len());
        while let Some(joined) = in_flight.next().await {
            let result = joined
                .map_err(|e| ClientError::RequestFailed(format!("worker task failed: {e}")))?;
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    // Dropping the remaining handles detaches the sibling
                    // tasks; they run to completion but nothing reads them.
                    warn!(
                        completed = outcomes.len(),
                        in_flight = in_flight.len(),
                        "Fan-out worker failed, discarding siblings"
                    );
                    return Err(e);
                }
            }
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::JobClient;
    use crate::config::ClientConfig;
    use crate::driver::DriverOptions;

    #[test]
    fn test_pool_size_floor() {
        let client = JobClient::new(ClientConfig::new("t")).unwrap();
        let driver = JobDriver::new(client, DriverOptions::default());
        let coordinator = FanOutCoordinator::new(driver).with_max_concurrency(0);
        assert_eq!(coordinator.max_concurrency, 1);
    }
}

//! Directory batch processing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use smute_media::is_supported_input;

use crate::error::PipelineResult;
use crate::pipeline::SmartMutePipeline;

/// Per-file results of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Inputs that produced an output, with the output path
    pub succeeded: Vec<(PathBuf, PathBuf)>,
    /// Inputs that failed, with the error rendered to text
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    /// Whether every file in the batch succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of files processed.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Run the pipeline over every supported audio file in `dir`.
///
/// Files run concurrently through a bounded pool
/// (`config.max_concurrent_files`); each gets its own full pipeline run and
/// its own temporary workspace. A failing file does not stop the batch —
/// all files are attempted and the summary reports both sides.
pub async fn process_directory(
    pipeline: &SmartMutePipeline,
    dir: impl AsRef<Path>,
) -> PipelineResult<BatchSummary> {
    let dir = dir.as_ref();

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_supported_input(&path) {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        warn!(dir = %dir.display(), "No supported audio files found");
        return Ok(BatchSummary::default());
    }

    info!(
        dir = %dir.display(),
        files = files.len(),
        pool = pipeline.config().max_concurrent_files,
        "Starting batch run"
    );

    let semaphore = Arc::new(Semaphore::new(pipeline.config().max_concurrent_files.max(1)));
    let mut in_flight = FuturesUnordered::new();

    for file in files {
        let pipeline = pipeline.clone();
        let semaphore = Arc::clone(&semaphore);
        in_flight.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("batch pool semaphore closed");
            let result = pipeline.process(&file).await;
            (file, result)
        }));
    }

    let mut summary = BatchSummary::default();
    while let Some(joined) = in_flight.next().await {
        match joined {
            Ok((file, Ok(output))) => {
                info!(input = %file.display(), output = %output.display(), "File processed");
                summary.succeeded.push((file, output));
            }
            Ok((file, Err(e))) => {
                error!(input = %file.display(), error = %e, "File failed");
                summary.failed.push((file, e.to_string()));
            }
            Err(e) => {
                error!(error = %e, "Batch worker task failed");
                summary
                    .failed
                    .push((PathBuf::new(), format!("worker task failed: {e}")));
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_accounting() {
        let mut summary = BatchSummary::default();
        assert!(summary.all_succeeded());
        assert_eq!(summary.total(), 0);

        summary
            .succeeded
            .push((PathBuf::from("a.wav"), PathBuf::from("a_smart_mute.wav")));
        summary
            .failed
            .push((PathBuf::from("b.wav"), "job timed out".to_string()));

        assert!(!summary.all_succeeded());
        assert_eq!(summary.total(), 2);
    }
}

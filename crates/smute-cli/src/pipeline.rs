//! The smart-mute pipeline: detect music, strip it per segment, reassemble.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use smute_client::{DriverOptions, JobClient, JobDriver};
use smute_media::{
    convert_to_canonical, is_supported_input, reassemble, AudioBuffer, CANONICAL_EXTENSION,
};
use smute_models::{parse_regions, JobMetadata};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};

/// End-to-end music removal for one input file.
///
/// Cheap to clone; directory batch mode runs one clone per file.
#[derive(Debug, Clone)]
pub struct SmartMutePipeline {
    client: JobClient,
    config: PipelineConfig,
}

impl SmartMutePipeline {
    /// Create a pipeline.
    pub fn new(client: JobClient, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn driver(&self) -> JobDriver {
        let options = DriverOptions::default()
            .with_poll_interval(self.config.poll_interval)
            .with_timeout(self.config.job_timeout);
        JobDriver::new(self.client.clone(), options)
    }

    /// Detect and remove music from `input`.
    ///
    /// The result is written next to the input as
    /// `{stem}_smart_mute.wav`, always in the canonical container, and its
    /// path is returned. The temporary workspace holding the normalized
    /// input, detection output and per-segment files is removed on every
    /// exit path, success or failure.
    pub async fn process(&self, input: impl AsRef<Path>) -> PipelineResult<PathBuf> {
        let input = input.as_ref();

        if !input.is_file() {
            return Err(PipelineError::InputNotFound(input.to_path_buf()));
        }
        if !is_supported_input(input) {
            return Err(PipelineError::UnsupportedInput(input.to_path_buf()));
        }

        tokio::fs::create_dir_all(&self.config.work_dir).await?;
        let workspace = tempfile::Builder::new()
            .prefix("smart_mute_")
            .tempdir_in(&self.config.work_dir)?;

        info!(input = %input.display(), workspace = %workspace.path().display(), "Starting smart mute");

        let result = self.process_in_workspace(input, workspace.path()).await;

        // The workspace and everything in it goes away here, whichever way
        // `result` went.
        drop(workspace);
        result
    }

    async fn process_in_workspace(
        &self,
        input: &Path,
        workspace: &Path,
    ) -> PipelineResult<PathBuf> {
        let normalized = convert_to_canonical(input, workspace).await?;
        let driver = self.driver();

        // 1. Detect music regions
        let detection = driver
            .run(&normalized, &JobMetadata::music_detection(), workspace)
            .await?;
        let regions_path = detection.outputs.into_single()?;
        let regions_json = tokio::fs::read_to_string(&regions_path).await?;
        let regions = parse_regions(&regions_json)
            .map_err(|e| PipelineError::Detection(e.to_string()))?;

        info!(regions = regions.len(), "Music detection finished");

        // 2. Strip each detected region remotely and splice the results back
        let original = AudioBuffer::read_wav(&normalized).await?;
        let segment_driver = driver.clone();
        let segment_workspace = workspace.to_path_buf();

        let processed = reassemble(&original, &regions, move |slice, index, _region| {
            run_removal_segment(
                segment_driver.clone(),
                segment_workspace.clone(),
                slice,
                index,
            )
        })
        .await?;

        // 3. Persist next to the original, always canonical WAV
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("input");
        let output_path = input.with_file_name(format!("{stem}_smart_mute.{CANONICAL_EXTENSION}"));
        processed.write_wav(&output_path).await?;

        info!(output = %output_path.display(), "Smart mute finished");
        Ok(output_path)
    }
}

/// Run one region's slice through a removal job and read back the result.
async fn run_removal_segment(
    driver: JobDriver,
    workspace: PathBuf,
    slice: AudioBuffer,
    index: usize,
) -> PipelineResult<AudioBuffer> {
    let slice_path = workspace.join(format!("slice_{index:03}.wav"));
    slice.write_wav(&slice_path).await?;

    debug!(index, slice = %slice_path.display(), "Submitting segment for music removal");

    let outcome = driver
        .run(&slice_path, &JobMetadata::music_removal(), &workspace)
        .await?;
    let output = outcome.outputs.into_single()?;
    Ok(AudioBuffer::read_wav(&output).await?)
}

//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for pipeline runs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delay between remote job status polls
    pub poll_interval: Duration,
    /// Wall-clock budget per remote job
    pub job_timeout: Duration,
    /// Maximum files processed concurrently in directory mode
    pub max_concurrent_files: usize,
    /// Parent directory for per-run temporary workspaces
    pub work_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            job_timeout: Duration::from_secs(600),
            max_concurrent_files: 5,
            work_dir: std::env::temp_dir(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("SMUTE_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            job_timeout: Duration::from_secs(
                std::env::var("SMUTE_JOB_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            max_concurrent_files: std::env::var("SMUTE_MAX_CONCURRENT_FILES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            work_dir: std::env::var("SMUTE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.job_timeout, Duration::from_secs(600));
        assert_eq!(config.max_concurrent_files, 5);
    }
}

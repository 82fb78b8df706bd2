//! Normalization of input files to the canonical WAV container.
//!
//! Anything that is not already a 16-bit PCM WAV is run through the ffmpeg
//! CLI. The encoder is treated as a black box: we pass a fixed argument set
//! and surface its stderr on failure.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Extension of the canonical raw-audio container.
pub const CANONICAL_EXTENSION: &str = "wav";

/// Input containers the pipeline accepts.
const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "flac", "ogg", "m4a", "aac", "mp4", "mkv", "mov", "webm",
];

/// Whether a path already carries the canonical extension.
pub fn is_canonical(path: impl AsRef<Path>) -> bool {
    extension_of(path.as_ref())
        .map(|ext| ext == CANONICAL_EXTENSION)
        .unwrap_or(false)
}

/// Whether a path's extension is on the input allow-list.
pub fn is_supported_input(path: impl AsRef<Path>) -> bool {
    extension_of(path.as_ref())
        .map(|ext| SUPPORTED_INPUT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Check that ffmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Convert `input` to a canonical WAV file inside `work_dir`.
///
/// A file that is already canonical is returned as-is without touching
/// ffmpeg. Unsupported containers are rejected before spawning anything.
pub async fn convert_to_canonical(
    input: impl AsRef<Path>,
    work_dir: impl AsRef<Path>,
) -> MediaResult<PathBuf> {
    let input = input.as_ref();
    let work_dir = work_dir.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }
    if !is_supported_input(input) {
        return Err(MediaError::UnsupportedFormat(
            extension_of(input).unwrap_or_else(|| "<none>".to_string()),
        ));
    }
    if is_canonical(input) {
        return Ok(input.to_path_buf());
    }

    check_ffmpeg()?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input");
    let output = work_dir.join(format!("{stem}.{CANONICAL_EXTENSION}"));

    debug!(
        input = %input.display(),
        output = %output.display(),
        "Converting input to canonical WAV"
    );

    let result = Command::new("ffmpeg")
        .args([
            "-y",
            "-hide_banner",
            "-loglevel",
            "error",
            "-i",
            input.to_str().unwrap_or_default(),
            // Audio only, 16-bit signed PCM
            "-vn",
            "-acodec",
            "pcm_s16le",
            output.to_str().unwrap_or_default(),
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(MediaError::conversion_failed(
            format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.lines().last().unwrap_or("unknown error")
            ),
            Some(stderr.to_string()),
        ));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_detection() {
        assert!(is_canonical("track.wav"));
        assert!(is_canonical("TRACK.WAV"));
        assert!(!is_canonical("track.mp3"));
        assert!(!is_canonical("track"));
    }

    #[test]
    fn test_allow_list() {
        assert!(is_supported_input("a.mp3"));
        assert!(is_supported_input("b.FLAC"));
        assert!(is_supported_input("c.mkv"));
        assert!(!is_supported_input("d.txt"));
        assert!(!is_supported_input("e"));
    }

    #[tokio::test]
    async fn test_missing_input_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_to_canonical(dir.path().join("nope.mp3"), dir.path()).await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("input.xyz");
        tokio::fs::write(&bogus, b"data").await.unwrap();

        let result = convert_to_canonical(&bogus, dir.path()).await;
        assert!(matches!(result, Err(MediaError::UnsupportedFormat(ext)) if ext == "xyz"));
    }

    #[tokio::test]
    async fn test_canonical_input_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("input.wav");
        tokio::fs::write(&wav, b"riff").await.unwrap();

        let out = convert_to_canonical(&wav, dir.path()).await.unwrap();
        assert_eq!(out, wav);
    }
}

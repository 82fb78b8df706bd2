//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(PathBuf),

    #[error("Invalid detection output: {0}")]
    Detection(String),

    #[error("Media error: {0}")]
    Media(#[from] smute_media::MediaError),

    #[error("Client error: {0}")]
    Client(#[from] smute_client::ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

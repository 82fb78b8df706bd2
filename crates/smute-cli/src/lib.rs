//! Smart-mute pipeline.
//!
//! This crate provides:
//! - The end-to-end pipeline: detect music, remove it per segment,
//!   reassemble and persist the result
//! - Directory batch processing with a bounded worker pool
//! - The `smute` binary

pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;

pub use batch::{process_directory, BatchSummary};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::SmartMutePipeline;

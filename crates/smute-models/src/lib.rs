//! Shared data models for the smute pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Remote assets, jobs and their lifecycle status
//! - Job metadata profiles (which remote model to run)
//! - Detected music time regions

pub mod job;
pub mod metadata;
pub mod region;

// Re-export common types
pub use job::{AssetId, JobId, JobStatus, OutputAsset, RemoteJob};
pub use metadata::JobMetadata;
pub use region::{parse_regions, TimeRegion};

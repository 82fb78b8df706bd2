//! Audio handling for the smute pipeline.
//!
//! This crate provides:
//! - PCM audio buffers backed by WAV files
//! - Normalization of arbitrary inputs to the canonical WAV container
//!   via the ffmpeg CLI
//! - The segment reassembly engine that splices remotely processed
//!   regions back into a copy of the original buffer

pub mod buffer;
pub mod convert;
pub mod error;
pub mod reassemble;

pub use buffer::AudioBuffer;
pub use convert::{convert_to_canonical, is_canonical, is_supported_input, CANONICAL_EXTENSION};
pub use error::{MediaError, MediaResult};
pub use reassemble::{reassemble, region_frame_bounds};

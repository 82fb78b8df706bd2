//! PCM audio buffers backed by WAV files.
//!
//! Samples are interleaved 16-bit signed PCM, the canonical container for
//! the whole pipeline. One frame is one sample per channel; all slicing and
//! length bookkeeping is done in frames so multi-channel audio is never cut
//! mid-frame.

use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::error::{MediaError, MediaResult};

/// An in-memory PCM buffer with a fixed sample rate and channel layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples.
    ///
    /// The sample count must be a whole number of frames.
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> MediaResult<Self> {
        if channels == 0 {
            return Err(MediaError::invalid_audio("zero channels"));
        }
        if sample_rate == 0 {
            return Err(MediaError::invalid_audio("zero sample rate"));
        }
        if samples.len() % channels as usize != 0 {
            return Err(MediaError::invalid_audio(format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// A silent buffer of `frames` frames.
    pub fn silent(frames: usize, sample_rate: u32, channels: u16) -> MediaResult<Self> {
        Self::new(vec![0; frames * channels as usize], sample_rate, channels)
    }

    /// Read a WAV file into a buffer.
    pub async fn read_wav(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        let bytes = tokio::fs::read(path).await?;
        Self::from_wav_reader(std::io::Cursor::new(bytes))
    }

    /// Parse WAV data from any reader.
    pub fn from_wav_reader(reader: impl Read) -> MediaResult<Self> {
        let mut wav = hound::WavReader::new(reader)?;
        let spec = wav.spec();

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, 16) => {
                wav.samples::<i16>().collect::<Result<Vec<_>, _>>()?
            }
            (format, bits) => {
                return Err(MediaError::invalid_audio(format!(
                    "expected 16-bit integer PCM, got {bits}-bit {format:?}"
                )));
            }
        };

        Self::new(samples, spec.sample_rate, spec.channels)
    }

    /// Write the buffer to a WAV file.
    pub async fn write_wav(&self, path: impl AsRef<Path>) -> MediaResult<()> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        self.to_wav_writer(&mut cursor)?;
        tokio::fs::write(path.as_ref(), cursor.into_inner()).await?;
        Ok(())
    }

    /// Serialize the buffer as WAV data into any writer.
    pub fn to_wav_writer(&self, writer: impl Write + Seek) -> MediaResult<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut wav = hound::WavWriter::new(writer, spec)?;
        for &sample in &self.samples {
            wav.write_sample(sample)?;
        }
        wav.finalize()?;
        Ok(())
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Mutable access to the interleaved samples.
    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Samples per second, per channel.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (one sample per channel each).
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Frame index for a time offset, truncated toward zero.
    pub fn frame_index(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate as f64) as usize
    }

    /// Copy out `start_frame..end_frame` as an independent buffer.
    ///
    /// Bounds beyond the end of the buffer are clamped, so an over-long
    /// range yields a shorter slice rather than an error.
    pub fn slice_frames(&self, start_frame: usize, end_frame: usize) -> Self {
        let ch = self.channels as usize;
        let start = (start_frame * ch).min(self.samples.len());
        let end = (end_frame * ch).min(self.samples.len()).max(start);
        Self {
            samples: self.samples[start..end].to_vec(),
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

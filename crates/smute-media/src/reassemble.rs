//! Segment reassembly: splice remotely processed regions back into a copy
//! of the original buffer.
//!
//! The engine walks the detected regions in the order supplied. Regions are
//! not re-sorted and overlaps are not merged; if regions overlap, later
//! writes overwrite earlier ones. Each region's slice is taken from the
//! in-progress processed buffer and handed to `process_segment`, and the
//! returned audio is written back with length reconciliation:
//!
//! - exact length: the region is replaced verbatim
//! - short return: the prefix is written, the tail of the region is zeroed
//! - long return: only the first `target` frames are used
//!
//! The processed buffer's frame count never changes.

use std::future::Future;

use tracing::{debug, info};

use smute_models::TimeRegion;

use crate::buffer::AudioBuffer;
use crate::error::{MediaError, MediaResult};

/// Frame bounds of a region within a buffer.
///
/// Seconds are truncated (not rounded) to frame indices and clamped to the
/// buffer end, matching slice semantics: an over-long region yields a
/// shorter span, never an out-of-bounds access.
pub fn region_frame_bounds(buffer: &AudioBuffer, region: &TimeRegion) -> (usize, usize) {
    let frames = buffer.num_frames();
    let start = buffer.frame_index(region.start_time).min(frames);
    let end = buffer.frame_index(region.end_time).min(frames).max(start);
    (start, end)
}

/// Run every region through `process_segment` and splice the results into a
/// copy of `original`.
///
/// `process_segment` receives the extracted slice, the region index and the
/// region itself, and returns the replacement audio. The returned buffer's
/// length may differ from the slice; reconciliation is applied as described
/// at the module level. The result always has exactly as many frames as
/// `original`.
///
/// The error type is the caller's; segment processing typically involves a
/// remote job whose failures must flow through unchanged.
pub async fn reassemble<F, Fut, E>(
    original: &AudioBuffer,
    regions: &[TimeRegion],
    mut process_segment: F,
) -> Result<AudioBuffer, E>
where
    F: FnMut(AudioBuffer, usize, TimeRegion) -> Fut,
    Fut: Future<Output = Result<AudioBuffer, E>>,
    E: From<MediaError>,
{
    let mut processed = original.clone();

    info!(
        regions = regions.len(),
        frames = processed.num_frames(),
        sample_rate = processed.sample_rate(),
        "Reassembling audio from processed segments"
    );

    for (index, region) in regions.iter().enumerate() {
        let (start_frame, end_frame) = region_frame_bounds(&processed, region);
        let target_frames = end_frame - start_frame;

        if target_frames == 0 {
            debug!(
                index,
                start_time = region.start_time,
                end_time = region.end_time,
                "Region spans no frames, skipping"
            );
            continue;
        }

        debug!(
            index,
            start_frame,
            end_frame,
            start_time = region.start_time,
            end_time = region.end_time,
            "Processing region"
        );

        let slice = processed.slice_frames(start_frame, end_frame);
        let returned = process_segment(slice, index, *region).await?;
        write_region(&mut processed, start_frame, target_frames, &returned).map_err(E::from)?;
    }

    debug_assert_eq!(processed.num_frames(), original.num_frames());
    Ok(processed)
}

/// Write a returned segment into the region starting at `start_frame`.
///
/// Copies `min(target, actual)` frames of the returned audio, zero-fills
/// whatever remains of the region, and discards any excess frames in an
/// over-long return.
fn write_region(
    processed: &mut AudioBuffer,
    start_frame: usize,
    target_frames: usize,
    returned: &AudioBuffer,
) -> MediaResult<()> {
    if returned.channels() != processed.channels() {
        return Err(MediaError::ChannelMismatch {
            expected: processed.channels(),
            actual: returned.channels(),
        });
    }

    let ch = processed.channels() as usize;
    let actual_frames = returned.num_frames();
    let copy_frames = actual_frames.min(target_frames);

    if actual_frames != target_frames {
        debug!(
            target_frames,
            actual_frames, "Returned segment length differs from region"
        );
    }

    let start = start_frame * ch;
    let copy_end = start + copy_frames * ch;
    let region_end = start + target_frames * ch;

    processed.samples_mut()[start..copy_end].copy_from_slice(&returned.samples()[..copy_frames * ch]);
    processed.samples_mut()[copy_end..region_end].fill(0);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_buffer(frames: usize, sample_rate: u32) -> AudioBuffer {
        let samples = (0..frames).map(|i| (i % 1000) as i16 + 1).collect();
        AudioBuffer::new(samples, sample_rate, 1).unwrap()
    }

    #[tokio::test]
    async fn test_no_regions_is_identity() {
        let original = ramp_buffer(1000, 8000);
        let processed = reassemble(&original, &[], |slice, _, _| async move {
            Ok::<_, MediaError>(slice)
        })
        .await
        .unwrap();
        assert_eq!(processed, original);
    }

    #[tokio::test]
    async fn test_exact_length_replaced_verbatim() {
        let original = ramp_buffer(8000, 8000);
        let regions = [TimeRegion::new(0.25, 0.5)];

        let processed = reassemble(&original, &regions, |slice, _, _| async move {
            AudioBuffer::new(vec![-7; slice.samples().len()], slice.sample_rate(), 1)
        })
        .await
        .unwrap();

        assert_eq!(processed.num_frames(), original.num_frames());
        assert_eq!(&processed.samples()[..2000], &original.samples()[..2000]);
        assert!(processed.samples()[2000..4000].iter().all(|&s| s == -7));
        assert_eq!(&processed.samples()[4000..], &original.samples()[4000..]);
    }

    #[tokio::test]
    async fn test_short_return_zero_fills_tail() {
        let original = ramp_buffer(8000, 8000);
        let regions = [TimeRegion::new(0.25, 0.5)]; // 2000 frames

        let processed = reassemble(&original, &regions, |slice, _, _| async move {
            // Return 500 frames short
            AudioBuffer::new(vec![-7; 1500], slice.sample_rate(), 1)
        })
        .await
        .unwrap();

        assert!(processed.samples()[2000..3500].iter().all(|&s| s == -7));
        assert!(processed.samples()[3500..4000].iter().all(|&s| s == 0));
        assert_eq!(&processed.samples()[4000..], &original.samples()[4000..]);
    }

    #[tokio::test]
    async fn test_long_return_is_truncated() {
        let original = ramp_buffer(8000, 8000);
        let regions = [TimeRegion::new(0.25, 0.5)];

        let processed = reassemble(&original, &regions, |slice, _, _| async move {
            // 1000 frames longer than the region
            AudioBuffer::new(vec![-7; 3000], slice.sample_rate(), 1)
        })
        .await
        .unwrap();

        assert_eq!(processed.num_frames(), original.num_frames());
        assert!(processed.samples()[2000..4000].iter().all(|&s| s == -7));
        // Nothing after the region is touched
        assert_eq!(&processed.samples()[4000..], &original.samples()[4000..]);
    }

    #[tokio::test]
    async fn test_region_past_buffer_end_is_clamped() {
        let original = ramp_buffer(4000, 8000); // 0.5s
        let regions = [TimeRegion::new(0.25, 2.0)];

        let processed = reassemble(&original, &regions, |slice, _, _| async move {
            assert_eq!(slice.num_frames(), 2000); // clamped to buffer end
            AudioBuffer::new(vec![-7; slice.samples().len()], slice.sample_rate(), 1)
        })
        .await
        .unwrap();

        assert_eq!(processed.num_frames(), 4000);
        assert!(processed.samples()[2000..].iter().all(|&s| s == -7));
    }

    #[tokio::test]
    async fn test_overlapping_regions_last_write_wins() {
        let original = ramp_buffer(8000, 8000);
        let regions = [TimeRegion::new(0.0, 0.5), TimeRegion::new(0.25, 0.75)];

        let processed = reassemble(&original, &regions, |slice, index, _| async move {
            let value = if index == 0 { 11 } else { 22 };
            AudioBuffer::new(vec![value; slice.samples().len()], slice.sample_rate(), 1)
        })
        .await
        .unwrap();

        assert!(processed.samples()[..2000].iter().all(|&s| s == 11));
        assert!(processed.samples()[2000..6000].iter().all(|&s| s == 22));
        assert_eq!(&processed.samples()[6000..], &original.samples()[6000..]);
    }

    #[tokio::test]
    async fn test_slice_comes_from_processed_buffer() {
        let original = ramp_buffer(8000, 8000);
        // Second region overlaps the first; its slice must contain the
        // first region's output, not the original samples.
        let regions = [TimeRegion::new(0.0, 0.5), TimeRegion::new(0.25, 0.5)];

        reassemble(&original, &regions, |slice, index, _| async move {
            if index == 1 {
                assert!(slice.samples().iter().all(|&s| s == 42));
            }
            AudioBuffer::new(vec![42; slice.samples().len()], slice.sample_rate(), 1)
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_channel_mismatch_is_an_error() {
        let original = ramp_buffer(8000, 8000);
        let regions = [TimeRegion::new(0.0, 0.5)];

        let result = reassemble(&original, &regions, |slice, _, _| async move {
            AudioBuffer::new(vec![0; slice.samples().len() * 2], slice.sample_rate(), 2)
        })
        .await;

        assert!(matches!(result, Err(MediaError::ChannelMismatch { .. })));
    }

    #[tokio::test]
    async fn test_stereo_zero_fill_covers_whole_frames() {
        let original = AudioBuffer::new(vec![5i16; 16000], 8000, 2).unwrap(); // 8000 frames
        let regions = [TimeRegion::new(0.0, 0.5)]; // 4000 frames

        let processed = reassemble(&original, &regions, |slice, _, _| async move {
            // 1000 frames short
            AudioBuffer::new(vec![-7; 3000 * 2], slice.sample_rate(), 2)
        })
        .await
        .unwrap();

        assert!(processed.samples()[..6000].iter().all(|&s| s == -7));
        // Both channels of the short tail are silenced
        assert!(processed.samples()[6000..8000].iter().all(|&s| s == 0));
        assert!(processed.samples()[8000..].iter().all(|&s| s == 5));
    }

    #[tokio::test]
    async fn test_segment_error_propagates() {
        let original = ramp_buffer(8000, 8000);
        let regions = [TimeRegion::new(0.0, 0.5)];

        let result = reassemble(&original, &regions, |_, _, _| async move {
            Err::<AudioBuffer, _>(MediaError::invalid_audio("remote returned garbage"))
        })
        .await;

        assert!(matches!(result, Err(MediaError::InvalidAudio(_))));
    }
}

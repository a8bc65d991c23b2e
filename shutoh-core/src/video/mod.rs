//! Sequential, seekable frame sources.
//!
//! [`VideoSource`] is the seam between the detection pipeline and whatever
//! produces decoded frames. [`FfmpegVideoStream`] decodes files through an
//! ffmpeg child process; [`MemoryVideoSource`] serves frames held in memory.
//!
//! A source has an analysis range `[start, end]` (inclusive frame numbers).
//! `read_next_frame` never returns frames past `end`, and `is_end_of_range`
//! reports whether the most recently read frame was the last one.

mod memory;
mod probe;
mod stream;

pub use memory::MemoryVideoSource;
pub use probe::{VideoInfo, parse_frame_rate, probe_video};
pub use stream::FfmpegVideoStream;

use crate::error::CoreResult;
use crate::timecode::FrameTimecode;
use image::RgbImage;

pub trait VideoSource: Send {
    /// Decodes the frame at the read cursor and advances it.
    ///
    /// Returns `None` past the end of the range or when decoding fails.
    fn read_next_frame(&mut self) -> Option<RgbImage>;

    /// Moves the read cursor so that the next read returns `frame_num`.
    fn seek(&mut self, frame_num: i64) -> CoreResult<()>;

    /// Position of the most recently read frame, or of the cursor before
    /// any frame has been read since the last seek.
    fn position(&self) -> FrameTimecode;

    /// True once the frame at `end` has been read.
    fn is_end_of_range(&self) -> bool;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn framerate(&self) -> f64;

    fn start(&self) -> FrameTimecode;

    fn end(&self) -> FrameTimecode;
}

/// Resolves an analysis range from optional user-facing time values.
///
/// `start` defaults to frame 0 and `end` to `last_frame`. When both `end`
/// and `duration` are given, `end` wins. The result is clamped to
/// `last_frame`.
pub fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    duration: Option<&str>,
    framerate: f64,
    last_frame: u64,
) -> CoreResult<(FrameTimecode, FrameTimecode)> {
    let start = match start {
        Some(text) => FrameTimecode::parse(text, framerate)?,
        None => FrameTimecode::from_frames(0, framerate)?,
    };

    let end = match (end, duration) {
        (Some(text), _) => FrameTimecode::parse(text, framerate)?,
        (None, Some(text)) => {
            let duration = FrameTimecode::parse(text, framerate)?;
            let end = start.try_add(&duration)?;
            // A duration of n frames ends on the n-th frame after start.
            end.with_frame(end.frame_num().saturating_sub(1).max(start.frame_num()))
        }
        (None, None) => FrameTimecode::from_frames(last_frame, framerate)?,
    };

    let start = start.with_frame(start.frame_num().min(last_frame));
    let end = end.with_frame(end.frame_num().clamp(start.frame_num(), last_frame));
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_range_defaults() {
        let (start, end) = resolve_range(None, None, None, 30.0, 299).unwrap();
        assert_eq!(start.frame_num(), 0);
        assert_eq!(end.frame_num(), 299);
    }

    #[test]
    fn test_resolve_range_end_beats_duration() {
        let (start, end) = resolve_range(Some("30"), Some("90"), Some("10"), 30.0, 299).unwrap();
        assert_eq!(start.frame_num(), 30);
        assert_eq!(end.frame_num(), 90);
    }

    #[test]
    fn test_resolve_range_duration() {
        let (start, end) = resolve_range(Some("1s"), None, Some("2s"), 30.0, 299).unwrap();
        assert_eq!(start.frame_num(), 30);
        assert_eq!(end.frame_num(), 89);
    }

    #[test]
    fn test_resolve_range_clamps_to_video() {
        let (start, end) = resolve_range(None, Some("00:01:00"), None, 30.0, 299).unwrap();
        assert_eq!(start.frame_num(), 0);
        assert_eq!(end.frame_num(), 299);
    }

    #[test]
    fn test_resolve_range_rejects_bad_values() {
        assert!(resolve_range(Some("abc"), None, None, 30.0, 299).is_err());
    }
}

//! Decoded frames as they travel from the decode thread to a detector.

use crate::timecode::FrameTimecode;
use image::RgbImage;

/// One decoded (and possibly downscaled) RGB frame.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub buffer: RgbImage,
    pub position: FrameTimecode,
    /// Set on the final frame of the analysis range.
    pub is_last: bool,
    /// Pixel count of `buffer` (width * height, not channel values).
    pub num_pixels: u64,
}

impl VideoFrame {
    pub fn new(buffer: RgbImage, position: FrameTimecode, is_last: bool) -> Self {
        let num_pixels = u64::from(buffer.width()) * u64::from(buffer.height());
        Self {
            buffer,
            position,
            is_last,
            num_pixels,
        }
    }

    pub fn frame_num(&self) -> u64 {
        self.position.frame_num()
    }
}

/// Message carried by the frame queue.
#[derive(Debug)]
pub enum FrameMessage {
    Frame(VideoFrame),
    /// The source stopped before delivering a frame flagged `is_last`.
    Exhausted,
}

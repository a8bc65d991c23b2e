use super::VideoSource;
use crate::error::{CoreError, CoreResult};
use crate::timecode::FrameTimecode;
use image::RgbImage;

/// A [`VideoSource`] over frames already decoded into memory.
#[derive(Debug, Clone)]
pub struct MemoryVideoSource {
    frames: Vec<RgbImage>,
    framerate: f64,
    start: u64,
    end: u64,
    next_frame: u64,
    last_read: Option<u64>,
}

impl MemoryVideoSource {
    /// Creates a source whose range covers every frame.
    pub fn new(frames: Vec<RgbImage>, framerate: f64) -> CoreResult<Self> {
        // Validates the frame rate
        FrameTimecode::from_frames(0, framerate)?;
        if frames.is_empty() {
            return Err(CoreError::InvalidConfig(
                "a video source needs at least one frame".to_string(),
            ));
        }
        let end = frames.len() as u64 - 1;
        Ok(Self {
            frames,
            framerate,
            start: 0,
            end,
            next_frame: 0,
            last_read: None,
        })
    }

    /// Narrows the analysis range to `[start, end]`.
    pub fn set_range(&mut self, start: u64, end: u64) -> CoreResult<()> {
        let last = self.frames.len() as u64 - 1;
        if end > last {
            return Err(CoreError::OverMaximumFrameNum {
                requested: end as i64,
                maximum: last,
            });
        }
        if start > end {
            return Err(CoreError::InvalidConfig(format!(
                "start frame {} is after end frame {}",
                start, end
            )));
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn timecode(&self, frame_num: u64) -> FrameTimecode {
        // The frame rate was validated in `new`, so this cannot fail.
        FrameTimecode::from_frames(frame_num, self.framerate)
            .unwrap_or_else(|_| unreachable!("frame rate validated at construction"))
    }
}

impl VideoSource for MemoryVideoSource {
    fn read_next_frame(&mut self) -> Option<RgbImage> {
        if self.next_frame > self.end {
            return None;
        }
        let image = self.frames.get(self.next_frame as usize)?.clone();
        self.last_read = Some(self.next_frame);
        self.next_frame += 1;
        Some(image)
    }

    fn seek(&mut self, frame_num: i64) -> CoreResult<()> {
        let frame = u64::try_from(frame_num).map_err(|_| CoreError::NegativeFrameNum(frame_num))?;
        let last = self.frames.len() as u64 - 1;
        if frame > last {
            return Err(CoreError::OverMaximumFrameNum {
                requested: frame_num,
                maximum: last,
            });
        }
        self.next_frame = frame;
        self.last_read = None;
        Ok(())
    }

    fn position(&self) -> FrameTimecode {
        self.timecode(self.last_read.unwrap_or(self.next_frame))
    }

    fn is_end_of_range(&self) -> bool {
        self.last_read.is_some_and(|frame| frame >= self.end)
    }

    fn width(&self) -> u32 {
        self.frames.first().map_or(0, |f| f.width())
    }

    fn height(&self) -> u32 {
        self.frames.first().map_or(0, |f| f.height())
    }

    fn framerate(&self) -> f64 {
        self.framerate
    }

    fn start(&self) -> FrameTimecode {
        self.timecode(self.start)
    }

    fn end(&self) -> FrameTimecode {
        self.timecode(self.end)
    }
}

// ============================================================================
// shutoh-core/src/video/stream.rs
// ============================================================================
//
// FFMPEG VIDEO STREAM: Frame-accurate reader over an ffmpeg child process
//
// Frames are decoded by ffmpeg into raw rgb24 on stdout and converted into
// `RgbImage` buffers. Seeking restarts the child with an input-side `-ss`,
// so the next frame read is the requested one.
//
// KEY COMPONENTS:
// - FfmpegVideoStream: VideoSource implementation for files on disk
// - FrameDecoder: owns one running ffmpeg child and its frame iterator
//
// ============================================================================

use super::VideoSource;
use super::probe::{VideoInfo, probe_video};
use crate::error::{CoreError, CoreResult};
use crate::timecode::FrameTimecode;
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::OutputVideoFrame;
use image::RgbImage;
use std::path::{Path, PathBuf};

struct FrameDecoder {
    child: FfmpegChild,
    frames: Box<dyn Iterator<Item = OutputVideoFrame> + Send>,
}

impl FrameDecoder {
    fn spawn(path: &Path, seconds: f64) -> CoreResult<Self> {
        log::trace!("Starting ffmpeg decoder for {} at {:.3}s", path.display(), seconds);
        let mut child = FfmpegCommand::new()
            .hide_banner()
            .args(["-ss", &format!("{:.6}", seconds)])
            .input(&*path.to_string_lossy())
            .args(["-an", "-sn"])
            .rawvideo()
            .spawn()
            .map_err(|e| crate::error::command_start_error("ffmpeg", e))?;

        let frames = match child.iter() {
            Ok(iter) => iter.filter_frames(),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(crate::error::command_failed_error(
                    "ffmpeg",
                    std::process::ExitStatus::default(),
                    e.to_string(),
                ));
            }
        };

        Ok(Self {
            child,
            frames: Box::new(frames),
        })
    }
}

impl Drop for FrameDecoder {
    fn drop(&mut self) {
        // The child may already have exited on its own.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A video file decoded through ffmpeg.
pub struct FfmpegVideoStream {
    path: PathBuf,
    info: VideoInfo,
    start: u64,
    end: u64,
    next_frame: u64,
    last_read: Option<u64>,
    decoder: Option<FrameDecoder>,
}

impl std::fmt::Debug for FfmpegVideoStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegVideoStream")
            .field("path", &self.path)
            .field("info", &self.info)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("next_frame", &self.next_frame)
            .field("last_read", &self.last_read)
            .finish_non_exhaustive()
    }
}

impl FfmpegVideoStream {
    /// Opens `path` with its whole length as the analysis range.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let info = probe_video(path)?;
        log::info!(
            "Opened {} ({}x{}, {:.3} fps, {} frames)",
            path.display(),
            info.width,
            info.height,
            info.framerate,
            info.total_frames
        );
        Ok(Self {
            path: path.to_path_buf(),
            end: info.total_frames - 1,
            info,
            start: 0,
            next_frame: 0,
            last_read: None,
            decoder: None,
        })
    }

    /// Restricts the analysis range and moves the cursor to its start.
    ///
    /// Values accept frame numbers, seconds (`"12.5"`, `"3s"`) or
    /// `HH:MM:SS[.nnn]` timecodes. `end` takes precedence over `duration`.
    pub fn set_time(
        &mut self,
        start: Option<&str>,
        end: Option<&str>,
        duration: Option<&str>,
    ) -> CoreResult<()> {
        let (start, end) = super::resolve_range(
            start,
            end,
            duration,
            self.info.framerate,
            self.info.total_frames - 1,
        )?;
        log::debug!("Analysis range set to {} - {}", start, end);
        self.start = start.frame_num();
        self.end = end.frame_num();
        self.seek(self.start as i64)
    }

    fn timecode(&self, frame_num: u64) -> FrameTimecode {
        // The frame rate was validated by the probe.
        FrameTimecode::from_frames(frame_num, self.info.framerate)
            .unwrap_or_else(|_| unreachable!("frame rate validated when opened"))
    }
}

impl VideoSource for FfmpegVideoStream {
    fn read_next_frame(&mut self) -> Option<RgbImage> {
        if self.next_frame > self.end {
            return None;
        }
        if self.decoder.is_none() {
            let seconds = self.timecode(self.next_frame).seconds();
            match FrameDecoder::spawn(&self.path, seconds) {
                Ok(decoder) => self.decoder = Some(decoder),
                Err(e) => {
                    log::error!("Failed to start decoding {}: {}", self.path.display(), e);
                    return None;
                }
            }
        }

        let frame = self.decoder.as_mut()?.frames.next()?;
        let Some(image) = RgbImage::from_raw(frame.width, frame.height, frame.data) else {
            log::error!(
                "ffmpeg produced a truncated {}x{} frame at {}",
                frame.width,
                frame.height,
                self.next_frame
            );
            return None;
        };

        self.last_read = Some(self.next_frame);
        self.next_frame += 1;
        Some(image)
    }

    fn seek(&mut self, frame_num: i64) -> CoreResult<()> {
        let frame = u64::try_from(frame_num).map_err(|_| CoreError::NegativeFrameNum(frame_num))?;
        let maximum = self.info.total_frames - 1;
        if frame > maximum {
            return Err(CoreError::OverMaximumFrameNum {
                requested: frame_num,
                maximum,
            });
        }

        self.decoder = None;
        let seconds = self.timecode(frame).seconds();
        let decoder = FrameDecoder::spawn(&self.path, seconds).map_err(|e| {
            log::error!("Seek to frame {} failed: {}", frame, e);
            CoreError::FailedToSetFramePosition(frame)
        })?;
        self.decoder = Some(decoder);
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
        self.info.width
    }

    fn height(&self) -> u32 {
        self.info.height
    }

    fn framerate(&self) -> f64 {
        self.info.framerate
    }

    fn start(&self) -> FrameTimecode {
        self.timecode(self.start)
    }

    fn end(&self) -> FrameTimecode {
        self.timecode(self.end)
    }
}

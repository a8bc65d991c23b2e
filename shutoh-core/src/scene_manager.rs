// ============================================================================
// shutoh-core/src/scene_manager.rs
// ============================================================================
//
// SCENE MANAGER: Runs a detector over a video source
//
// A scoped decode thread reads frames from the source, downscales them and
// pushes them into a bounded queue. The calling thread drains the queue into
// the detector and collects cut frame numbers, which are afterwards turned
// into contiguous scenes covering the analysis range.
//
// KEY COMPONENTS:
// - SceneManager: owns the detector and the results of the last run
// - SceneManagerOptions: downscale target width and queue capacity
// - decode_frames: producer side of the pipeline
//
// ============================================================================

use crate::detector::SceneDetector;
use crate::error::{CoreError, CoreResult};
use crate::frame::{FrameMessage, VideoFrame};
use crate::queue::{BlockingQueue, MAX_FRAME_QUEUE_LENGTH};
use crate::reporting::{DetectionSummary, NullReporter, Reporter};
use crate::timecode::FrameTimecode;
use crate::video::VideoSource;
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Frames wider than this are downscaled by an integer factor before detection.
pub const DEFAULT_MIN_WIDTH: u32 = 256;

pub const DEFAULT_QUEUE_CAPACITY: usize = MAX_FRAME_QUEUE_LENGTH;

/// Inclusive start and end of a scene. The end of one scene is the start of
/// the next.
pub type Scene = (FrameTimecode, FrameTimecode);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneManagerOptions {
    pub min_width: u32,
    pub queue_capacity: usize,
}

impl Default for SceneManagerOptions {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Integer factor that brings `width` down to roughly `min_width`, never below 1.
pub fn compute_downscale_factor(width: u32, min_width: u32) -> u32 {
    if min_width == 0 {
        return 1;
    }
    (width / min_width).max(1)
}

pub struct SceneManager {
    detector: Box<dyn SceneDetector>,
    options: SceneManagerOptions,
    cuts: Vec<u64>,
    range: Option<(FrameTimecode, FrameTimecode)>,
    reporter: Arc<dyn Reporter>,
}

impl SceneManager {
    pub fn new(detector: Box<dyn SceneDetector>) -> Self {
        Self::with_options(detector, SceneManagerOptions::default())
    }

    pub fn with_options(detector: Box<dyn SceneDetector>, options: SceneManagerOptions) -> Self {
        Self {
            detector,
            options,
            cuts: Vec::new(),
            range: None,
            reporter: Arc::new(NullReporter),
        }
    }

    /// Sends progress events of later runs to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Decodes the analysis range of `video` and runs the detector over it.
    ///
    /// Returns once every frame up to the end of the range has been processed
    /// or the source stops producing frames. The decode thread has been
    /// joined by then.
    pub fn detect_scenes(&mut self, video: &mut dyn VideoSource) -> CoreResult<()> {
        let start = video.start();
        let end = video.end();
        video.seek(start.frame_num() as i64)?;

        let factor = compute_downscale_factor(video.width(), self.options.min_width);
        log::info!(
            "Detecting scenes with the {} detector from {} to {} (downscale x{})",
            self.detector.name(),
            start,
            end,
            factor
        );

        let started = Instant::now();
        let name = self.detector.name();
        let reporter = self.reporter.as_ref();
        reporter.detection_started(name, end.frame_num().saturating_sub(start.frame_num()) + 1);

        let queue = BlockingQueue::new(self.options.queue_capacity);
        let detector = self.detector.as_mut();
        let mut cuts = Vec::new();

        let decoded = thread::scope(|scope| {
            let queue = &queue;
            let producer = scope.spawn(move || decode_frames(video, factor, queue));
            {
                let _close = CloseOnDrop(queue);
                consume_frames(queue, detector, reporter, &mut cuts);
            }
            producer.join()
        })
        .map_err(|_| CoreError::DecodeThreadPanicked)?;

        log::info!(
            "Processed {} frames, found {} cuts",
            decoded,
            cuts.len()
        );
        reporter.detection_complete(&DetectionSummary {
            detector: name,
            frames_processed: decoded as u64,
            cuts: cuts.len(),
            elapsed_secs: started.elapsed().as_secs_f64(),
        });
        self.cuts = cuts;
        self.range = Some((start, end));
        Ok(())
    }

    /// Raw cut frame numbers from the last run, strictly increasing.
    pub fn cut_list(&self) -> &[u64] {
        &self.cuts
    }

    /// Scenes covering the analysis range of the last run without gaps.
    pub fn get_scene_list(&self) -> CoreResult<Vec<Scene>> {
        let (start, end) = self
            .range
            .ok_or(CoreError::FunctionIsNotCalled("detect_scenes", "get_scene_list"))?;

        let mut bounds = Vec::with_capacity(self.cuts.len() + 2);
        bounds.push(start);
        bounds.extend(
            self.cuts
                .iter()
                .filter(|&&cut| cut > start.frame_num() && cut < end.frame_num())
                .map(|&cut| start.with_frame(cut)),
        );
        bounds.push(end);

        Ok(bounds.windows(2).map(|pair| (pair[0], pair[1])).collect())
    }
}

fn consume_frames(
    queue: &BlockingQueue<FrameMessage>,
    detector: &mut dyn SceneDetector,
    reporter: &dyn Reporter,
    cuts: &mut Vec<u64>,
) {
    loop {
        match queue.pop() {
            FrameMessage::Frame(frame) => {
                if let Some(cut) = detector.process_frame(&frame) {
                    if cuts.last().is_none_or(|&last| cut > last) {
                        log::debug!("Cut detected at frame {}", cut);
                        reporter.cut_found(cut);
                        cuts.push(cut);
                    } else {
                        log::debug!("Ignoring out-of-order cut at frame {}", cut);
                    }
                }
                reporter.frame_processed(frame.position.frame_num());
                if frame.is_last {
                    break;
                }
            }
            FrameMessage::Exhausted => {
                log::debug!("Video source ended before the end of the range");
                break;
            }
        }
    }
}

/// Reads frames until the end of the range, returning how many were queued.
fn decode_frames(
    video: &mut dyn VideoSource,
    factor: u32,
    queue: &BlockingQueue<FrameMessage>,
) -> usize {
    let mut guard = ExhaustedOnDrop {
        queue,
        armed: true,
    };
    let mut count = 0;

    while let Some(image) = video.read_next_frame() {
        let position = video.position();
        let is_last = video.is_end_of_range();
        let frame = VideoFrame::new(downscale(image, factor), position, is_last);
        if !queue.push(FrameMessage::Frame(frame)) {
            break;
        }
        count += 1;
        if is_last {
            guard.armed = false;
            break;
        }
    }
    count
}

fn downscale(image: RgbImage, factor: u32) -> RgbImage {
    if factor <= 1 {
        return image;
    }
    let width = (image.width() / factor).max(1);
    let height = (image.height() / factor).max(1);
    imageops::resize(&image, width, height, FilterType::Triangle)
}

// Tells the consumer that no flagged end frame is coming. Runs on normal
// exhaustion and when the decode thread unwinds.
struct ExhaustedOnDrop<'a> {
    queue: &'a BlockingQueue<FrameMessage>,
    armed: bool,
}

impl Drop for ExhaustedOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.queue.push(FrameMessage::Exhausted);
        }
    }
}

// Releases a producer blocked on a full queue once the consumer is done.
struct CloseOnDrop<'a>(&'a BlockingQueue<FrameMessage>);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

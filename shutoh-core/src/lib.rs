//! Core library for shot boundary detection in video files.
//!
//! Frames are decoded by ffmpeg on a background thread, passed through a
//! bounded queue and analyzed by one of several detectors. The resulting cut
//! points are turned into contiguous scenes that can be written to CSV, used
//! to extract thumbnails or to split the source video.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use shutoh_core::{DetectorConfig, FfmpegVideoStream, SceneManager, build_detector};
//!
//! let config = DetectorConfig::from_env();
//! let mut video = FfmpegVideoStream::open("/path/to/video.mp4").unwrap();
//! video.set_time(None, None, Some("60s")).unwrap();
//!
//! let mut manager = SceneManager::new(build_detector(&config));
//! manager.detect_scenes(&mut video).unwrap();
//!
//! for (start, end) in manager.get_scene_list().unwrap() {
//!     println!("{} - {}", start, end);
//! }
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod flash_filter;
pub mod frame;
pub mod output;
pub mod queue;
pub mod reporting;
pub mod scene_manager;
pub mod timecode;
pub mod video;

// Re-exports for public API
pub use config::{DetectorConfig, DetectorConfigBuilder, DetectorKind};
pub use detector::{SceneDetector, build_detector};
pub use error::{CoreError, CoreResult};
pub use flash_filter::{FilterMode, FlashFilter};
pub use frame::{FrameMessage, VideoFrame};
pub use queue::BlockingQueue;
pub use reporting::{DetectionSummary, NullReporter, Reporter};
pub use scene_manager::{Scene, SceneManager, SceneManagerOptions, compute_downscale_factor};
pub use timecode::FrameTimecode;
pub use video::{FfmpegVideoStream, MemoryVideoSource, VideoSource};

//! Scene detection algorithms.
//!
//! Every detector consumes frames one at a time, in increasing frame order,
//! and may answer each frame with the frame number of a cut. Detectors are
//! stateful and enforce their own minimum scene length. They are owned by a
//! single thread for the duration of one run.

mod adaptive;
mod content;
mod hash;
mod histogram;
mod threshold;

pub use adaptive::AdaptiveDetector;
pub use content::{ContentDetector, ContentScorer};
pub use hash::{HashDetector, median};
pub use histogram::HistogramDetector;
pub use threshold::{FadeType, ThresholdDetector, fade_split_frame};

use crate::config::{DetectorConfig, DetectorKind};
use crate::frame::VideoFrame;

/// A per-frame scene cut detection algorithm.
pub trait SceneDetector: Send {
    /// Processes the next frame and returns a cut frame number, if any.
    fn process_frame(&mut self, frame: &VideoFrame) -> Option<u64>;

    /// Short algorithm name used in logs.
    fn name(&self) -> &'static str;
}

/// Builds the detector described by `config`, resetting out-of-range
/// parameters to their defaults first.
pub fn build_detector(config: &DetectorConfig) -> Box<dyn SceneDetector> {
    let config = config.sanitized();
    let threshold = config.effective_threshold();
    let min_scene_len = non_negative(config.min_scene_len);

    log::debug!(
        "Building {} detector (threshold={}, min_scene_len={})",
        config.kind,
        threshold,
        min_scene_len
    );

    match config.kind {
        DetectorKind::Content => Box::new(ContentDetector::new(threshold, min_scene_len)),
        DetectorKind::Adaptive => Box::new(AdaptiveDetector::new(
            threshold,
            min_scene_len,
            non_negative(config.window_width) as usize,
            config.min_content_val,
        )),
        DetectorKind::Hash => Box::new(HashDetector::new(
            threshold,
            min_scene_len,
            non_negative(config.dct_size) as u32,
            non_negative(config.lowpass) as u32,
        )),
        DetectorKind::Histogram => Box::new(HistogramDetector::new(
            threshold,
            min_scene_len,
            non_negative(config.bins) as usize,
        )),
        DetectorKind::Threshold => Box::new(ThresholdDetector::new(
            threshold,
            min_scene_len,
            config.fade_bias,
        )),
    }
}

fn non_negative(value: i32) -> u64 {
    u64::try_from(value).unwrap_or(0)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_factory_builds_each_kind() {
        for kind in DetectorKind::ALL {
            let detector = build_detector(&DetectorConfig::for_kind(kind));
            assert_eq!(detector.name(), kind.as_str());
        }
    }

    #[test]
    fn test_factory_sanitizes_negative_threshold() {
        // A negative threshold would flag every frame. After sanitizing it
        // falls back to 27 and a static sequence produces no cuts.
        let config = DetectorConfig {
            threshold: Some(-4.0),
            min_scene_len: -1,
            ..DetectorConfig::default()
        };
        let mut detector = build_detector(&config);
        let frames = (0..40).map(|i| solid_frame(i, [90, 90, 90]));
        assert!(run_detector(detector.as_mut(), frames).is_empty());
    }
}

//! Content detector: fast cuts from the mean HSV distance between frames.

use super::SceneDetector;
use crate::flash_filter::{FilterMode, FlashFilter};
use crate::frame::VideoFrame;
use image::RgbImage;

/// Mean per-channel HSV distance between consecutive frames.
///
/// HSV uses the 8-bit layout: hue in `0..180`, saturation and value in
/// `0..=255`. The first frame scores 0.
#[derive(Debug, Clone, Default)]
pub struct ContentScorer {
    last_hsv: Option<Vec<u8>>,
}

impl ContentScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&mut self, frame: &VideoFrame) -> f32 {
        let hsv = to_hsv(&frame.buffer);
        let score = match &self.last_hsv {
            Some(last) if last.len() == hsv.len() && frame.num_pixels > 0 => {
                let total: u64 = last
                    .iter()
                    .zip(&hsv)
                    .map(|(&a, &b)| u64::from(a.abs_diff(b)))
                    .sum();
                (total as f64 / frame.num_pixels as f64 / 3.0) as f32
            }
            _ => 0.0,
        };
        self.last_hsv = Some(hsv);
        score
    }
}

fn to_hsv(image: &RgbImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.as_raw().len());
    for pixel in image.pixels() {
        out.extend_from_slice(&rgb_to_hsv(pixel.0));
    }
    out
}

pub(crate) fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v == 0 {
        0
    } else {
        (255 * delta + v / 2) / v
    };

    let h = if delta == 0 {
        0
    } else {
        let degrees = if v == r {
            60.0 * (g - b) as f32 / delta as f32
        } else if v == g {
            120.0 + 60.0 * (b - r) as f32 / delta as f32
        } else {
            240.0 + 60.0 * (r - g) as f32 / delta as f32
        };
        let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };
        // 180 wraps back to red
        ((degrees / 2.0).round() as i32) % 180
    };

    [h as u8, s as u8, v as u8]
}

/// Detects cuts where the content score exceeds a fixed threshold.
///
/// Flagged frames are debounced by a [`FlashFilter`] in merge mode with a
/// length of `min_scene_len`. A run of consecutive flagged frames yields at
/// most one direct cut, at its first frame.
#[derive(Debug, Clone)]
pub struct ContentDetector {
    threshold: f32,
    scorer: ContentScorer,
    flash_filter: FlashFilter,
    /// Set while the flagged run that produced the last cut continues.
    in_cut_run: bool,
}

impl ContentDetector {
    pub fn new(threshold: f32, min_scene_len: u64) -> Self {
        Self {
            threshold,
            scorer: ContentScorer::new(),
            flash_filter: FlashFilter::new(FilterMode::Merge, min_scene_len),
            in_cut_run: false,
        }
    }
}

impl SceneDetector for ContentDetector {
    fn process_frame(&mut self, frame: &VideoFrame) -> Option<u64> {
        let score = self.scorer.score(frame);
        let above_threshold = score > self.threshold;
        let cut = self.flash_filter.filter(frame.frame_num(), above_threshold);

        if !above_threshold {
            self.in_cut_run = false;
            return cut;
        }
        if self.in_cut_run {
            // The filter still sees the frame, but the run already has its cut.
            return None;
        }
        self.in_cut_run = cut.is_some();
        cut
    }

    fn name(&self) -> &'static str {
        "content"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_hsv_conversion() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 0, 1]), [0, 255, 255]);
    }

    #[test]
    fn test_first_frame_scores_zero() {
        let mut scorer = ContentScorer::new();
        assert_eq!(scorer.score(&solid_frame(0, [255, 255, 255])), 0.0);
    }

    #[test]
    fn test_score_is_mean_channel_distance() {
        let mut scorer = ContentScorer::new();
        scorer.score(&solid_frame(0, [128, 128, 128]));
        // Only V changes, by 127, averaged over three channels.
        let score = scorer.score(&solid_frame(1, [255, 255, 255]));
        assert!((score - 127.0 / 3.0).abs() < 1e-4, "score={}", score);
        // Identical frames score 0.
        assert_eq!(scorer.score(&solid_frame(2, [255, 255, 255])), 0.0);
    }

    #[test]
    fn test_hard_cut_detected() {
        let mut detector = ContentDetector::new(27.0, 15);
        let frames = (0..60).map(|i| {
            if i < 30 {
                solid_frame(i, [20, 20, 20])
            } else {
                solid_frame(i, [230, 230, 230])
            }
        });
        assert_eq!(run_detector(&mut detector, frames), vec![30]);
    }

    #[test]
    fn test_score_equal_to_threshold_is_not_a_cut() {
        let mut detector = ContentDetector::new((127.0f64 / 3.0) as f32, 0);
        let frames = (0..4).map(|i| {
            if i < 2 {
                solid_frame(i, [128, 128, 128])
            } else {
                solid_frame(i, [255, 255, 255])
            }
        });
        let cuts = run_detector(&mut detector, frames);
        assert!(cuts.is_empty(), "cuts={:?}", cuts);
    }

    #[test]
    fn test_flagged_run_yields_a_single_cut() {
        // Frames 2 and 3 both differ from their predecessor: into and out of white.
        let mut detector = ContentDetector::new(27.0, 1);
        let values = [128u8, 128, 255, 128, 128];
        let frames = values
            .iter()
            .enumerate()
            .map(|(i, &v)| solid_frame(i as u64, [v, v, v]));
        assert_eq!(run_detector(&mut detector, frames), vec![2]);
    }

    #[test]
    fn test_separate_runs_each_cut_with_zero_min_len() {
        let mut detector = ContentDetector::new(27.0, 0);
        let values = [10u8, 10, 240, 240, 240, 10, 10];
        let frames = values
            .iter()
            .enumerate()
            .map(|(i, &v)| solid_frame(i as u64, [v, v, v]));
        // Frame 5 starts a new run after the unflagged frames 3 and 4.
        assert_eq!(run_detector(&mut detector, frames), vec![2, 5]);
    }

    #[test]
    fn test_rapid_changes_merge_into_spaced_cuts() {
        let mut detector = ContentDetector::new(27.0, 10);
        // A cut at 20, then the picture flips every 4 frames until 40.
        let bright = |i: u64| (20..40).contains(&i) && ((i - 20) / 4) % 2 == 0;
        let frames = (0..80).map(|i| {
            if bright(i) {
                solid_frame(i, [240, 240, 240])
            } else {
                solid_frame(i, [10, 10, 10])
            }
        });
        let cuts = run_detector(&mut detector, frames);
        assert_eq!(cuts, vec![20, 40]);
    }
}

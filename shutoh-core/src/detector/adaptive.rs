//! Adaptive detector: content scores compared against a rolling local average.
//!
//! Fast camera motion raises every content score in its neighbourhood, so a
//! fixed threshold either misses cuts or fires continuously. This detector
//! keeps the last `2 * window_width + 1` scores and cuts at the center frame
//! when its score stands out from the frames around it.

use super::SceneDetector;
use super::content::ContentScorer;
use crate::frame::VideoFrame;
use std::collections::VecDeque;

/// Ratio reported when the surrounding average is (close to) zero.
const MAX_RATIO: f32 = 255.0;
const MIN_AVERAGE: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct AdaptiveDetector {
    adaptive_threshold: f32,
    min_scene_len: u64,
    window_width: usize,
    min_content_val: f32,
    scorer: ContentScorer,
    window: VecDeque<(u64, f32)>,
    last_cut: Option<u64>,
}

impl AdaptiveDetector {
    pub fn new(
        adaptive_threshold: f32,
        min_scene_len: u64,
        window_width: usize,
        min_content_val: f32,
    ) -> Self {
        let window_width = window_width.max(1);
        Self {
            adaptive_threshold,
            min_scene_len,
            window_width,
            min_content_val,
            scorer: ContentScorer::new(),
            window: VecDeque::with_capacity(2 * window_width + 1),
            last_cut: None,
        }
    }

    fn required_frames(&self) -> usize {
        2 * self.window_width + 1
    }

    /// Ratio of the center score to the mean of its neighbours.
    fn adaptive_ratio(&self, center_score: f32) -> f32 {
        let neighbours: f32 = self
            .window
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.window_width)
            .map(|(_, (_, score))| *score)
            .sum();
        let average = neighbours / (2 * self.window_width) as f32;

        if average.abs() >= MIN_AVERAGE {
            (center_score / average).min(MAX_RATIO)
        } else if center_score >= self.min_content_val {
            MAX_RATIO
        } else {
            0.0
        }
    }
}

impl SceneDetector for AdaptiveDetector {
    fn process_frame(&mut self, frame: &VideoFrame) -> Option<u64> {
        let frame_num = frame.frame_num();
        let score = self.scorer.score(frame);
        let last_cut = *self.last_cut.get_or_insert(frame_num);

        self.window.push_back((frame_num, score));
        if self.window.len() > self.required_frames() {
            self.window.pop_front();
        }
        if self.window.len() < self.required_frames() {
            return None;
        }

        let (target_frame, target_score) = self.window[self.window_width];
        let ratio = self.adaptive_ratio(target_score);

        let is_cut = ratio >= self.adaptive_threshold
            && target_score >= self.min_content_val
            && target_frame.saturating_sub(last_cut) >= self.min_scene_len;
        if is_cut {
            log::trace!(
                "adaptive cut at {} (ratio {:.2}, score {:.2})",
                target_frame,
                ratio,
                target_score
            );
            self.last_cut = Some(target_frame);
            return Some(target_frame);
        }
        None
    }

    fn name(&self) -> &'static str {
        "adaptive"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_isolated_cut_reported_at_center_frame() {
        let mut detector = AdaptiveDetector::new(3.0, 15, 2, 15.0);
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
    fn test_no_cut_until_window_full() {
        let mut detector = AdaptiveDetector::new(3.0, 0, 2, 15.0);
        // Four frames never fill the five-frame window.
        let frames = (0..4).map(|i| {
            if i < 1 {
                solid_frame(i, [0, 0, 0])
            } else {
                solid_frame(i, [255, 255, 255])
            }
        });
        assert!(run_detector(&mut detector, frames).is_empty());
    }

    #[test]
    fn test_steady_motion_is_not_a_cut() {
        let mut detector = AdaptiveDetector::new(3.0, 15, 2, 15.0);
        // Every frame differs from the previous one by the same amount.
        let frames = (0..40).map(|i| {
            if i % 2 == 0 {
                solid_frame(i, [60, 60, 60])
            } else {
                solid_frame(i, [200, 200, 200])
            }
        });
        assert!(run_detector(&mut detector, frames).is_empty());
    }

    #[test]
    fn test_consecutive_cuts_spaced_by_min_scene_len() {
        let mut detector = AdaptiveDetector::new(3.0, 10, 2, 15.0);
        // Cuts every 6 frames; only those at least 10 frames apart survive.
        let frames = (0..80).map(|i| {
            if (i / 6) % 2 == 0 {
                solid_frame(i, [20, 20, 20])
            } else {
                solid_frame(i, [230, 230, 230])
            }
        });
        let cuts = run_detector(&mut detector, frames);
        assert_eq!(cuts, vec![12, 24, 36, 48, 60, 72]);
    }

    #[test]
    fn test_ratio_with_zero_neighbours() {
        let mut detector = AdaptiveDetector::new(3.0, 0, 1, 15.0);
        detector.window.extend([(0, 0.0), (1, 20.0), (2, 0.0)]);
        assert_eq!(detector.adaptive_ratio(20.0), MAX_RATIO);
        assert_eq!(detector.adaptive_ratio(10.0), 0.0);
    }
}

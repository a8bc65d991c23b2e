//! Threshold detector: fades to and from black.
//!
//! The mean intensity of every frame is compared against a fixed threshold.
//! A frame below it starts a fade-out, and the next frame at or above it
//! completes the fade-in. The cut is placed between the two, skewed by
//! `fade_bias`.

use super::SceneDetector;
use crate::frame::VideoFrame;
use image::RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeType {
    FadeIn,
    FadeOut,
}

#[derive(Debug, Clone)]
pub struct ThresholdDetector {
    threshold: f32,
    min_scene_len: u64,
    fade_bias: f32,
    last_fade: Option<(FadeType, u64)>,
    last_cut: Option<u64>,
}

impl ThresholdDetector {
    pub fn new(threshold: f32, min_scene_len: u64, fade_bias: f32) -> Self {
        Self {
            threshold,
            min_scene_len,
            fade_bias,
            last_fade: None,
            last_cut: None,
        }
    }
}

/// Cut position for a fade that went out at `fade_out` and came back at `fade_in`.
///
/// A bias of 0 yields the midpoint, -1 the fade-out frame and +1 the fade-in frame.
pub fn fade_split_frame(fade_out: u64, fade_in: u64, fade_bias: f32) -> u64 {
    let (out, inn) = (fade_out as f64, fade_in as f64);
    let split = (inn + out + f64::from(fade_bias) * (inn - out)) / 2.0;
    split.round().max(0.0) as u64
}

/// Mean over every channel value of every pixel.
fn mean_intensity(image: &RgbImage) -> f32 {
    let raw = image.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| u64::from(v)).sum();
    (sum as f64 / raw.len() as f64) as f32
}

impl SceneDetector for ThresholdDetector {
    fn process_frame(&mut self, frame: &VideoFrame) -> Option<u64> {
        let frame_num = frame.frame_num();
        let last_cut = *self.last_cut.get_or_insert(frame_num);
        let intensity = mean_intensity(&frame.buffer);
        let below = intensity < self.threshold;

        let Some((fade, fade_frame)) = self.last_fade else {
            let fade = if below { FadeType::FadeOut } else { FadeType::FadeIn };
            self.last_fade = Some((fade, frame_num));
            return None;
        };

        match fade {
            FadeType::FadeIn if below => {
                self.last_fade = Some((FadeType::FadeOut, frame_num));
                None
            }
            FadeType::FadeOut if !below => {
                let mut cut = None;
                if frame_num.saturating_sub(last_cut) >= self.min_scene_len {
                    let split = fade_split_frame(fade_frame, frame_num, self.fade_bias);
                    log::trace!(
                        "fade from {} to {}, cut at {}",
                        fade_frame,
                        frame_num,
                        split
                    );
                    cut = Some(split);
                    self.last_cut = Some(frame_num);
                }
                self.last_fade = Some((FadeType::FadeIn, frame_num));
                cut
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn fade_clip() -> impl Iterator<Item = VideoFrame> {
        (0..150).map(|i| {
            if (100..120).contains(&i) {
                solid_frame(i, [2, 2, 2])
            } else {
                solid_frame(i, [180, 180, 180])
            }
        })
    }

    #[test]
    fn test_fade_split_frame() {
        assert_eq!(fade_split_frame(100, 120, 0.0), 110);
        assert_eq!(fade_split_frame(100, 120, 1.0), 120);
        assert_eq!(fade_split_frame(100, 120, -1.0), 100);
        assert_eq!(fade_split_frame(100, 101, 0.0), 101);
    }

    #[test]
    fn test_fade_to_black_and_back() {
        let mut detector = ThresholdDetector::new(12.0, 15, 0.0);
        assert_eq!(run_detector(&mut detector, fade_clip()), vec![110]);
    }

    #[test]
    fn test_fade_bias_moves_cut() {
        let mut detector = ThresholdDetector::new(12.0, 15, 1.0);
        assert_eq!(run_detector(&mut detector, fade_clip()), vec![120]);
        let mut detector = ThresholdDetector::new(12.0, 15, -1.0);
        assert_eq!(run_detector(&mut detector, fade_clip()), vec![100]);
    }

    #[test]
    fn test_fade_too_soon_after_start_is_ignored() {
        let mut detector = ThresholdDetector::new(12.0, 15, 0.0);
        let frames = (0..30).map(|i| {
            if (5..8).contains(&i) {
                solid_frame(i, [0, 0, 0])
            } else {
                solid_frame(i, [100, 100, 100])
            }
        });
        assert!(run_detector(&mut detector, frames).is_empty());
    }

    #[test]
    fn test_bright_content_never_cuts() {
        let mut detector = ThresholdDetector::new(12.0, 0, 0.0);
        let frames = (0..20).map(|i| solid_frame(i, [50 + i as u8, 60, 70]));
        assert!(run_detector(&mut detector, frames).is_empty());
    }
}

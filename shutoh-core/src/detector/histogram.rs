//! Histogram detector: correlation of luma histograms between frames.

use super::SceneDetector;
use crate::frame::VideoFrame;
use image::RgbImage;

#[derive(Debug, Clone)]
pub struct HistogramDetector {
    /// Correlation at or below which a cut is reported.
    max_correlation: f64,
    min_scene_len: u64,
    bins: usize,
    last_hist: Option<Vec<f64>>,
    last_cut: Option<u64>,
}

impl HistogramDetector {
    /// `threshold` is the tolerated loss of correlation: a cut requires the
    /// correlation to drop to `1 - threshold` (clamped to `[0, 1]`) or below.
    pub fn new(threshold: f32, min_scene_len: u64, bins: usize) -> Self {
        Self {
            max_correlation: (1.0 - f64::from(threshold)).clamp(0.0, 1.0),
            min_scene_len,
            bins: bins.clamp(1, 256),
            last_hist: None,
            last_cut: None,
        }
    }

    /// L2-normalized histogram of BT.601 luma.
    pub fn histogram(&self, image: &RgbImage) -> Vec<f64> {
        let mut hist = vec![0.0; self.bins];
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            let luma = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b))
                .round()
                .clamp(0.0, 255.0) as usize;
            hist[luma * self.bins / 256] += 1.0;
        }
        let norm = hist.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut hist {
                *v /= norm;
            }
        }
        hist
    }
}

/// Pearson correlation of two histograms. Flat inputs correlate perfectly.
pub(crate) fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 1.0;
    }
    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let (mut num, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a[..n].iter().zip(&b[..n]) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        num += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = var_a * var_b;
    if denom.abs() > f64::EPSILON {
        num / denom.sqrt()
    } else {
        1.0
    }
}

impl SceneDetector for HistogramDetector {
    fn process_frame(&mut self, frame: &VideoFrame) -> Option<u64> {
        let frame_num = frame.frame_num();
        let last_cut = *self.last_cut.get_or_insert(frame_num);
        let hist = self.histogram(&frame.buffer);

        let mut cut = None;
        if let Some(last_hist) = &self.last_hist {
            let corr = correlation(last_hist, &hist);
            if corr <= self.max_correlation
                && frame_num.saturating_sub(last_cut) >= self.min_scene_len
            {
                cut = Some(frame_num);
                self.last_cut = cut;
            }
        }

        self.last_hist = Some(hist);
        cut
    }

    fn name(&self) -> &'static str {
        "histogram"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_histogram_is_unit_length() {
        let detector = HistogramDetector::new(0.05, 15, 64);
        let hist = detector.histogram(&split_frame(0, [0, 0, 0], [255, 255, 255]).buffer);
        assert_eq!(hist.len(), 64);
        let norm: f64 = hist.iter().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-9);
        // Half the pixels fall in the first bin, half in the last.
        assert!((hist[0] - hist[63]).abs() < 1e-12);
    }

    #[test]
    fn test_correlation() {
        let a = [1.0, 2.0, 3.0];
        assert!((correlation(&a, &a) - 1.0).abs() < 1e-12);
        assert!((correlation(&a, &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert_eq!(correlation(&[1.0, 1.0], &[2.0, 2.0]), 1.0);
    }

    #[test]
    fn test_threshold_is_clamped() {
        assert!((HistogramDetector::new(0.05, 0, 256).max_correlation - 0.95).abs() < 1e-6);
        assert_eq!(HistogramDetector::new(1.5, 0, 256).max_correlation, 0.0);
        assert_eq!(HistogramDetector::new(-0.5, 0, 256).max_correlation, 1.0);
    }

    #[test]
    fn test_brightness_change_is_a_cut() {
        let mut detector = HistogramDetector::new(0.05, 15, 256);
        let frames = (0..40).map(|i| {
            if i < 20 {
                solid_frame(i, [40, 40, 40])
            } else {
                solid_frame(i, [200, 200, 200])
            }
        });
        assert_eq!(run_detector(&mut detector, frames), vec![20]);
    }

    #[test]
    fn test_cuts_respect_min_scene_len() {
        let mut detector = HistogramDetector::new(0.05, 10, 256);
        let frames = (0..30).map(|i| {
            if i % 2 == 0 {
                solid_frame(i, [40, 40, 40])
            } else {
                solid_frame(i, [200, 200, 200])
            }
        });
        assert_eq!(run_detector(&mut detector, frames), vec![10, 20]);
    }
}
